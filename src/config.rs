//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

/// REST backend settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the ordering API
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:4000/api")]
    pub base_url: String,
}

/// Local persistence settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the cart snapshot and session token
    #[arg(long, env = "CHOWCART_DATA_DIR", default_value = ".chowcart")]
    pub data_dir: PathBuf,
}

/// Order polling settings.
#[derive(Debug, Clone, Args)]
pub struct PollingConfig {
    /// Seconds between order status fetches
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "5")]
    pub interval_secs: u64,
}

impl PollingConfig {
    /// The polling cadence as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Full client configuration assembled from flags and environment.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Backend settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Polling settings.
    #[command(flatten)]
    pub polling: PollingConfig,
}
