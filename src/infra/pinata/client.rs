// Responsible for all communication with the Pinata pinning API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::PinningService;
use crate::domain::qr::DataUrl;
use crate::infra::config::ServiceConfig;

/// Body returned by `POST /pinning/pinFileToIPFS`.
#[derive(Debug, Deserialize)]
pub struct PinFileResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
}

#[derive(Debug, Clone)]
pub struct PinataCredentials {
    pub api_key: String,
    pub secret_api_key: String,
}

/// HTTP client for Pinata's file pinning endpoints.
pub struct PinataClient {
    http: reqwest::Client,
    base_url: String,
    credentials: PinataCredentials,
}

impl PinataClient {
    pub fn new(
        credentials: PinataCredentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        Self::new(
            PinataCredentials {
                api_key: config.pinata_api_key.clone(),
                secret_api_key: config.pinata_secret_api_key.clone(),
            },
            config.pinata_api_url.clone(),
            config.pinning_timeout,
        )
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("pinata_api_key", &self.credentials.api_key)
            .header("pinata_secret_api_key", &self.credentials.secret_api_key)
    }

    /// Checks that the configured credentials are accepted.
    pub async fn test_authentication(&self) -> anyhow::Result<()> {
        let url = format!("{}/data/testAuthentication", self.base_url);
        let resp = self.authed(self.http.get(&url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Pinata authentication failed ({}): {}",
                status,
                body
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(&self, name: &str, file: DataUrl) -> anyhow::Result<String> {
        let url = format!("{}/pinning/pinFileToIPFS", self.base_url);
        let size = file.bytes.len();

        // Strip MIME parameters (`svg+xml;charset=utf-8` -> `svg+xml`) for the file name.
        let extension = file.extension.split(';').next().unwrap_or_default();
        let part = Part::bytes(file.bytes)
            .file_name(format!("{}.{}", name, extension))
            .mime_str(&file.mime)?;
        let metadata = serde_json::json!({ "name": name }).to_string();
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        debug!(bytes = size, %url, "pinning file");
        let resp = self.authed(self.http.post(&url)).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Pinata responded {}: {}", status, body));
        }

        let pinned: PinFileResponse = resp.json().await?;
        info!(ipfs_hash = %pinned.ipfs_hash, pin_size = pinned.pin_size, "file pinned");
        Ok(pinned.ipfs_hash)
    }
}
