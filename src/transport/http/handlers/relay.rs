//! Upload relay: forwards data-URL images to the pinning service and records metadata.

use crate::domain::qr::parse_data_url;
use crate::infra::pinata::QR_PIN_NAME;
use crate::storage::NewMedicineDocument;
use crate::transport::http::handlers::common::relay_error;
use crate::transport::http::types::{AppState, RelayError, UploadRequest, UploadResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{error, info, warn};

#[utoipa::path(
    post,
    path = "/api/upload-ipfs",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Image pinned", body = UploadResponse),
        (status = 400, description = "Missing or malformed image", body = RelayError),
        (status = 500, description = "Pinning service or document store failure", body = RelayError)
    )
)]
pub async fn upload_ipfs_handler(
    State(state): State<AppState>,
    request: Result<Json<UploadRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return relay_error(StatusCode::BAD_REQUEST, "Invalid JSON body", Some(e.to_string()))
                .into_response();
        }
    };

    let image = match request.image.as_deref() {
        Some(image) if !image.is_empty() => image,
        _ => return relay_error(StatusCode::BAD_REQUEST, "No image provided", None).into_response(),
    };

    let Some(file) = parse_data_url(image) else {
        warn!("rejected upload with malformed image");
        return relay_error(StatusCode::BAD_REQUEST, "Invalid image format", None).into_response();
    };

    let ipfs_hash = match state.pinning.pin_file(QR_PIN_NAME, file).await {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "pinning service upload failed");
            return relay_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upload failed",
                Some(e.to_string()),
            )
            .into_response();
        }
    };
    info!(%ipfs_hash, "relay upload pinned");

    // Metadata is recorded only when the medicine fields came along with the image.
    if let (Some(name), Some(batch_number)) = (request.name, request.batch_number) {
        let doc = NewMedicineDocument {
            id: None,
            name,
            batch_number,
            manufacturer_address: request.manufacturer_address,
            expiry_date: request.expiry_date,
            ipfs_hash: ipfs_hash.clone(),
            created_at: None,
        };
        if let Err(e) = state.documents.upsert(doc).await {
            error!(error = %e, "saving medicine document failed");
            return relay_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upload failed",
                Some(e.to_string()),
            )
            .into_response();
        }
    }

    (StatusCode::OK, Json(UploadResponse { ipfs_hash })).into_response()
}

#[utoipa::path(
    get,
    path = "/api/medicines",
    responses(
        (status = 200, description = "Stored medicines, newest first"),
        (status = 500, description = "Document store failure", body = RelayError)
    )
)]
pub async fn list_medicines_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.documents.list_newest_first().await {
        Ok(docs) => (StatusCode::OK, Json(docs)).into_response(),
        Err(e) => {
            error!(error = %e, "listing medicine documents failed");
            relay_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch medicines",
                Some(e.to_string()),
            )
            .into_response()
        }
    }
}
