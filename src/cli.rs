use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tokenbound-wallet")]
#[command(version)]
#[command(about = "A TUI explorer for Starknet token-bound accounts")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Network to connect to (mainnet, sepolia)
    #[arg(short, long, env = "TOKENBOUND_NETWORK", default_value = "sepolia")]
    pub network: String,

    /// Marketplace API base URL
    #[arg(long, env = "MARKETPLACE_API_URL")]
    pub marketplace_url: String,

    /// Marketplace API key, sent as `x-api-key`
    #[arg(long, env = "MARKETPLACE_API_KEY", hide_env_values = true)]
    pub marketplace_api_key: Option<String>,

    /// Alchemy API key used to build the Starknet RPC URL
    #[arg(long, env = "ALCHEMY_API_KEY", hide_env_values = true)]
    pub alchemy_api_key: Option<String>,

    /// Custom Starknet RPC URL (overrides the Alchemy URL)
    #[arg(long, env = "STARKNET_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Wallet bridge JSON-RPC endpoint
    #[arg(long, env = "TOKENBOUND_BRIDGE_URL")]
    pub bridge_url: Option<String>,

    /// Token-bound account registry contract address
    #[arg(long, env = "TBA_REGISTRY_ADDRESS")]
    pub registry_address: Option<String>,

    /// Token-bound account implementation class hash
    #[arg(long, env = "TBA_IMPLEMENTATION_ADDRESS")]
    pub implementation_address: Option<String>,

    /// Wallet address whose NFTs are listed
    #[arg(short, long, env = "WALLET_ADDRESS")]
    pub wallet: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
