use crate::app::pipeline::RegistrationPipeline;
use crate::app::state::AppStore;
use crate::domain::model::UserRole;
use crate::infra::pinata::PinningService;
use crate::infra::wallet::WalletProvider;
use crate::storage::MedicineStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Request-body limit; QR images travel as base64 data URLs.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AppStore>,
    pub pipeline: Arc<RegistrationPipeline>,
    pub pinning: Arc<dyn PinningService>,
    pub documents: Arc<dyn MedicineStore>,
    pub wallet: Arc<dyn WalletProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<AppStore>,
        pinning: Arc<dyn PinningService>,
        documents: Arc<dyn MedicineStore>,
        wallet: Arc<dyn WalletProvider>,
    ) -> Self {
        let pipeline = Arc::new(RegistrationPipeline::new(
            store.clone(),
            pinning.clone(),
            documents.clone(),
        ));
        Self {
            store,
            pipeline,
            pinning,
            documents,
            wallet,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /api/upload-ipfs`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// `data:<mime>;base64,<data>` image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub manufacturer_address: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub ipfs_hash: String,
}

/// Error body used by the relay endpoints.
#[derive(Serialize, Debug, ToSchema)]
pub struct RelayError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = String, example = "admin")]
    pub role: UserRole,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyRequest {
    /// Text decoded from the QR code.
    pub payload: String,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; empty or absent returns every record.
    #[serde(default)]
    pub q: Option<String>,
}
