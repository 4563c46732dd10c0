//! Auth session and wallet connection.

use crate::app::wallet::{connect_wallet, disconnect_wallet};
use crate::transport::http::handlers::common::{fail, json_400, ok};
use crate::transport::http::types::{ApiResponse, AppState, LoginRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session replaced", body = ApiResponse),
        (status = 400, description = "Invalid role", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{\"role\": \"admin\" | \"user\"}"),
    };
    let session = state.store.login(request.role).await;
    info!(role = ?request.role, "logged in");
    ok(session)
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared", body = ApiResponse))
)]
pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.store.logout().await;
    ok(state.store.auth().await)
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses((status = 200, description = "Current session", body = ApiResponse))
)]
pub async fn session_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.store.auth().await)
}

#[utoipa::path(
    post,
    path = "/api/wallet/connect",
    responses(
        (status = 200, description = "Wallet connected", body = ApiResponse),
        (status = 502, description = "Wallet provider failed", body = ApiResponse)
    )
)]
pub async fn connect_wallet_handler(State(state): State<AppState>) -> impl IntoResponse {
    match connect_wallet(&state.store, state.wallet.as_ref()).await {
        Ok(wallet) => ok(wallet),
        Err(e) => fail(StatusCode::BAD_GATEWAY, format!("Wallet connection failed: {}", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/wallet/disconnect",
    responses((status = 200, description = "Wallet disconnected", body = ApiResponse))
)]
pub async fn disconnect_wallet_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok(disconnect_wallet(&state.store).await)
}

#[utoipa::path(
    get,
    path = "/api/wallet",
    responses((status = 200, description = "Current wallet connection", body = ApiResponse))
)]
pub async fn wallet_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.store.wallet().await)
}
