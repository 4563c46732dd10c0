use crate::transport::http::handlers::common::fail;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Document store reachable; includes registry counts", body = ApiResponse),
        (status = 503, description = "Document store unreachable", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.documents.ping().await {
        warn!(error = %e, "health check: document store unreachable");
        return fail(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Document store ping failed: {}", e),
        );
    }

    let counts = state
        .store
        .read(|snapshot| {
            serde_json::json!({
                "status": "ok",
                "medicines": snapshot.medicines.len(),
                "finalized": snapshot.medicines.iter().filter(|m| m.stage.is_finalized()).count(),
                "transactions": snapshot.transactions.len(),
            })
        })
        .await;
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(counts),
            error: None,
        }),
    )
}
