// src/bin/api_server.rs

use mediqr_service::domain::model::{sample_medicines, sample_transactions};
use mediqr_service::infra::config::ServiceConfig;
use mediqr_service::transport;
use mediqr_service::{
    AppSnapshot, AppStore, InMemoryMedicineStore, MedicineStore, PinataClient, PostgresMedicineStore,
    SimulatedWallet,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // --- Document store ---
    let documents: Arc<dyn MedicineStore> = match config.database_url.as_deref() {
        Some(url) => {
            info!("connecting to Postgres document store");
            Arc::new(PostgresMedicineStore::connect(url).await?)
        }
        None => {
            warn!("DATABASE_URL not set, keeping medicine documents in memory");
            Arc::new(InMemoryMedicineStore::new())
        }
    };

    // --- Collaborators ---
    let pinning = Arc::new(PinataClient::from_config(&config)?);
    let wallet = Arc::new(SimulatedWallet::new(config.wallet_delay));
    info!(pinata = %config.pinata_api_url, "pinning client ready");

    // --- Application state ---
    let initial = if config.seed_sample_data {
        info!("seeding sample medicines and transactions");
        AppSnapshot::with_seed(sample_medicines(), sample_transactions())
    } else {
        AppSnapshot::default()
    };
    let store = Arc::new(AppStore::new(initial));
    let app_state = transport::http::AppState::new(store, pinning, documents, wallet);

    // --- API Server ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
