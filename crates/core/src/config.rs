use serde::Deserialize;

/// Global application settings loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Address of the deployed EventEmitter contract (hex, 0x-prefixed).
    pub emitter_address: String,

    /// Block number to start watching from (0 for genesis).
    pub start_block: u64,

    /// Number of blocks to fetch per batch.
    pub batch_size: u64,

    /// Seconds to wait between polls once caught up with the chain head.
    pub poll_interval_secs: u64,

    /// Port for the counter inspector API.
    pub api_port: u16,

    /// Private key used by the emitter binary to sign transactions.
    /// Empty unless the emitter is being run.
    pub private_key: String,
}

impl Settings {
    /// Load settings from environment variables (with optional `.env` file).
    pub fn from_env() -> eyre::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: std::env::var("RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".into()),
            emitter_address: std::env::var("EMITTER_ADDRESS").unwrap_or_default(),
            start_block: std::env::var("START_BLOCK")
                .unwrap_or_else(|_| "0".into())
                .parse()?,
            batch_size: std::env::var("BATCH_SIZE")
                .unwrap_or_else(|_| "100".into())
                .parse()?,
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".into())
                .parse()?,
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()?,
            private_key: std::env::var("PRIVATE_KEY").unwrap_or_default(),
        })
    }
}
