use crate::app::verification::verify_scan;
use crate::transport::http::handlers::common::{json_400, ok};
use crate::transport::http::types::{ApiResponse, AppState, VerifyRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification result (valid, expired or invalid)", body = ApiResponse),
        (status = 400, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn verify_handler(
    State(state): State<AppState>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{\"payload\": \"...\"}"),
    };
    ok(verify_scan(&state.store, &request.payload).await)
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses((status = 200, description = "Transaction log, newest first", body = ApiResponse))
)]
pub async fn transactions_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.store.transactions().await)
}
