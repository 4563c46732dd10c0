//! Wallet providers.
//!
//! Only a simulated provider ships; a browser-injected provider has no server-side
//! counterpart.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::model::WalletConnection;

pub const SIMULATED_ADDRESS: &str = "0x4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c";
pub const SIMULATED_BALANCE: &str = "1.25";

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Requests an externally-owned account and its balance.
    async fn request_account(&self) -> anyhow::Result<WalletConnection>;
}

/// Returns a fixed account after `delay`.
pub struct SimulatedWallet {
    delay: Duration,
}

impl SimulatedWallet {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request_account(&self) -> anyhow::Result<WalletConnection> {
        tokio::time::sleep(self.delay).await;
        Ok(WalletConnection {
            address: SIMULATED_ADDRESS.to_string(),
            balance: SIMULATED_BALANCE.to_string(),
            is_connected: true,
        })
    }
}
