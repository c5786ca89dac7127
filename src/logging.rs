use color_eyre::eyre::Result;
use tracing::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use tokenbound_wallet::config::get_data_dir;

const LOG_FILE: &str = "tokenbound-wallet.log";

/// Log to a file in the data directory; stdout belongs to the terminal UI.
///
/// `RUST_LOG` adds directives on top of `tokenbound_wallet=debug`.
pub fn init() -> Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_file = std::fs::File::create(data_dir.join(LOG_FILE))?;

    let filter = EnvFilter::from_default_env()
        .add_directive("tokenbound_wallet=debug".parse()?)
        .add_directive("reqwest=info".parse()?);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(true)
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Log a panic message and where it happened.
pub fn log_panic(panic: &std::panic::PanicHookInfo) {
    let payload = panic.payload();
    let msg = payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload");

    match panic.location() {
        Some(loc) => error!("Panic: {} at {}:{}:{}", msg, loc.file(), loc.line(), loc.column()),
        None => error!("Panic: {} at unknown location", msg),
    }
}
