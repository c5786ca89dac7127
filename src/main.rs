use color_eyre::Result;

mod action;
mod app;
mod cli;
mod components;
mod errors;
mod logging;
mod tui;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    errors::install_hooks()?;

    let args = cli::Args::parse_args();

    if let Some(ref data_dir) = args.data_dir {
        // SAFETY: set during startup, before any task reads the environment
        unsafe {
            std::env::set_var("TOKENBOUND_WALLET_DATA", data_dir);
        }
    }

    logging::init()?;

    let mut app = app::App::new(&args)?;

    app.run().await?;

    Ok(())
}
