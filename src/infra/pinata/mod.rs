pub mod client;

use async_trait::async_trait;

use crate::domain::qr::DataUrl;

pub use client::{PinataClient, PinataCredentials};

/// Name attached to every pinned QR image.
pub const QR_PIN_NAME: &str = "medicine-qr";

/// Content-addressed storage for uploaded files.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Pins `file` under `name` and returns its content reference (an IPFS CID).
    async fn pin_file(&self, name: &str, file: DataUrl) -> anyhow::Result<String>;
}
