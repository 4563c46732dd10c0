use crate::app::pipeline::RegistrationInput;
use crate::app::verification::{ScanResult, ScanStatus};
use crate::transport::http::handlers::{health, registry, relay, session, verify};
use crate::transport::http::types::{
    ApiResponse, LoginRequest, RelayError, UploadRequest, UploadResponse, VerifyRequest,
    MAX_BODY_BYTES,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        relay::upload_ipfs_handler,
        relay::list_medicines_handler,
        session::login_handler,
        session::logout_handler,
        session::session_handler,
        session::connect_wallet_handler,
        session::disconnect_wallet_handler,
        session::wallet_handler,
        registry::register_medicine_handler,
        registry::search_medicines_handler,
        registry::get_by_batch_handler,
        registry::tag_expired_handler,
        registry::resume_registration_handler,
        verify::verify_handler,
        verify::transactions_handler
    ),
    components(schemas(
        ApiResponse,
        UploadRequest,
        UploadResponse,
        RelayError,
        LoginRequest,
        VerifyRequest,
        RegistrationInput,
        ScanResult,
        ScanStatus
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        // Relay
        .route("/api/upload-ipfs", post(relay::upload_ipfs_handler))
        .route("/api/medicines", get(relay::list_medicines_handler))
        // Session
        .route("/api/auth/login", post(session::login_handler))
        .route("/api/auth/logout", post(session::logout_handler))
        .route("/api/auth/session", get(session::session_handler))
        .route("/api/wallet", get(session::wallet_handler))
        .route("/api/wallet/connect", post(session::connect_wallet_handler))
        .route("/api/wallet/disconnect", post(session::disconnect_wallet_handler))
        // Registry
        .route(
            "/api/registry/medicines",
            post(registry::register_medicine_handler).get(registry::search_medicines_handler),
        )
        .route(
            "/api/registry/batches/:batch",
            get(registry::get_by_batch_handler),
        )
        .route(
            "/api/registry/medicines/:id/expire",
            post(registry::tag_expired_handler),
        )
        .route(
            "/api/registry/medicines/:id/resume",
            post(registry::resume_registration_handler),
        )
        // Verification
        .route("/api/verify", post(verify::verify_handler))
        .route("/api/transactions", get(verify::transactions_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
