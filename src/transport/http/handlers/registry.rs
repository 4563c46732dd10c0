use crate::app::pipeline::RegistrationInput;
use crate::transport::http::handlers::common::{
    fail, json_400, ok, registry_error, require_admin,
};
use crate::transport::http::types::{ApiResponse, AppState, SearchQuery};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/registry/medicines",
    request_body = RegistrationInput,
    responses(
        (status = 200, description = "Medicine registered, QR generated and pinned", body = ApiResponse),
        (status = 400, description = "Invalid input or no wallet connected", body = ApiResponse),
        (status = 403, description = "Admin session required", body = ApiResponse),
        (status = 409, description = "Batch number already registered", body = ApiResponse),
        (status = 502, description = "Pinning service or document store failed; record kept as failed", body = ApiResponse)
    )
)]
pub async fn register_medicine_handler(
    State(state): State<AppState>,
    request: Result<Json<RegistrationInput>, JsonRejection>,
) -> impl IntoResponse {
    if let Err(resp) = require_admin(&state).await {
        return resp.into_response();
    }
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_400(
                e,
                "{\"name\", \"batchNumber\", \"expiryDate\", \"manufacturerAddress\"?}",
            )
            .into_response()
        }
    };

    match state.pipeline.register(input).await {
        Ok(record) => ok(record).into_response(),
        Err(e) => registry_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/registry/medicines",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching medicines in registration order", body = ApiResponse)
    )
)]
pub async fn search_medicines_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    let found = state.store.search(q.trim()).await;
    ok(found)
}

#[utoipa::path(
    get,
    path = "/api/registry/batches/{batch}",
    params(
        ("batch" = String, Path, description = "Exact batch number")
    ),
    responses(
        (status = 200, description = "Medicine found", body = ApiResponse),
        (status = 404, description = "No medicine with this batch number", body = ApiResponse)
    )
)]
pub async fn get_by_batch_handler(
    State(state): State<AppState>,
    Path(batch): Path<String>,
) -> impl IntoResponse {
    match state.store.medicine_by_batch(&batch).await {
        Some(record) => ok(record),
        None => fail(
            StatusCode::NOT_FOUND,
            format!("No medicine with batch number '{}'", batch),
        ),
    }
}

#[utoipa::path(
    post,
    path = "/api/registry/medicines/{id}/expire",
    params(
        ("id" = String, Path, description = "Medicine id")
    ),
    responses(
        (status = 200, description = "Medicine tagged as expired", body = ApiResponse),
        (status = 403, description = "Admin session required", body = ApiResponse),
        (status = 404, description = "Unknown medicine", body = ApiResponse)
    )
)]
pub async fn tag_expired_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(resp) = require_admin(&state).await {
        return resp;
    }
    match state.store.tag_expired(&id).await {
        Ok(record) => {
            info!(%id, "medicine tagged as expired");
            ok(record)
        }
        Err(e) => registry_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/registry/medicines/{id}/resume",
    params(
        ("id" = String, Path, description = "Medicine id")
    ),
    responses(
        (status = 200, description = "Registration finalized", body = ApiResponse),
        (status = 403, description = "Admin session required", body = ApiResponse),
        (status = 404, description = "Unknown medicine", body = ApiResponse),
        (status = 502, description = "A collaborator failed again", body = ApiResponse)
    )
)]
pub async fn resume_registration_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(resp) = require_admin(&state).await {
        return resp;
    }
    match state.pipeline.resume(&id).await {
        Ok(record) => ok(record),
        Err(e) => registry_error(e),
    }
}
