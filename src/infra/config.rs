//! Centralized configuration (environment variables + defaults).

use std::time::Duration;

pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_PORT: u16 = 5000;

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow::anyhow!("{} must be set", name)),
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    optional(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Pinata API key (required).
pub fn pinata_api_key() -> anyhow::Result<String> {
    required("PINATA_API_KEY")
}

/// Pinata API secret (required).
pub fn pinata_secret_api_key() -> anyhow::Result<String> {
    required("PINATA_SECRET_API_KEY")
}

/// Pinata API base URL. Overridable so tests and staging can point at a stand-in.
pub fn pinata_api_url() -> String {
    optional("PINATA_API_URL").unwrap_or_else(|| DEFAULT_PINATA_API_URL.to_string())
}

/// Postgres connection string for the document store.
///
/// When unset the service keeps documents in memory.
pub fn database_url() -> Option<String> {
    optional("DATABASE_URL")
}

pub fn port() -> u16 {
    parsed_or("PORT", DEFAULT_PORT)
}

/// Delay of the simulated wallet provider.
pub fn wallet_delay() -> Duration {
    Duration::from_millis(parsed_or("WALLET_DELAY_MS", 1000))
}

/// Outbound request timeout for the pinning service.
pub fn pinning_timeout() -> Duration {
    Duration::from_secs(parsed_or("PINNING_TIMEOUT_SECS", 30))
}

pub fn seed_sample_data() -> bool {
    optional("SEED_SAMPLE_DATA").as_deref() == Some("true")
}

/// Everything the API server needs at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub pinata_api_key: String,
    pub pinata_secret_api_key: String,
    pub pinata_api_url: String,
    pub database_url: Option<String>,
    pub port: u16,
    pub wallet_delay: Duration,
    pub pinning_timeout: Duration,
    pub seed_sample_data: bool,
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            pinata_api_key: pinata_api_key()?,
            pinata_secret_api_key: pinata_secret_api_key()?,
            pinata_api_url: pinata_api_url(),
            database_url: database_url(),
            port: port(),
            wallet_delay: wallet_delay(),
            pinning_timeout: pinning_timeout(),
            seed_sample_data: seed_sample_data(),
        })
    }
}
