//! Shared harness: a stand-in Pinata API and an in-process service on ephemeral ports.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use mediqr_service::domain::model::{sample_medicines, sample_transactions};
use mediqr_service::storage::{NewMedicineDocument, StoredMedicine};
use mediqr_service::transport;
use mediqr_service::{
    AppSnapshot, AppStore, InMemoryMedicineStore, MedicineStore, PinataClient, PinataCredentials,
    SimulatedWallet,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY: &str = "test-key";
pub const SECRET_KEY: &str = "test-secret";
pub const FAKE_CID: &str = "QmTestCid1111111111111111111111111111111111111";

/// Controls and observes the stand-in pinning API.
#[derive(Default)]
pub struct FakePinata {
    pub failing: AtomicBool,
    pub pins: AtomicUsize,
}

async fn pin_file(
    State(fake): State<Arc<FakePinata>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let authed = headers.get("pinata_api_key").and_then(|v| v.to_str().ok()) == Some(API_KEY)
        && headers.get("pinata_secret_api_key").and_then(|v| v.to_str().ok()) == Some(SECRET_KEY);
    if !authed {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })));
    }
    if fake.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "pinning unavailable" })),
        );
    }
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"file\"") || !text.contains("medicine-qr") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing file part" })));
    }
    fake.pins.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::OK,
        Json(json!({
            "IpfsHash": FAKE_CID,
            "PinSize": body.len(),
            "Timestamp": "2024-01-01T00:00:00Z"
        })),
    )
}

async fn test_authentication(headers: HeaderMap) -> impl IntoResponse {
    if headers.get("pinata_api_key").and_then(|v| v.to_str().ok()) == Some(API_KEY) {
        (StatusCode::OK, Json(json!({ "message": "Congratulations!" })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })))
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// Starts the stand-in Pinata API and returns its base URL.
pub async fn spawn_fake_pinata(fake: Arc<FakePinata>) -> String {
    let router = Router::new()
        .route("/pinning/pinFileToIPFS", post(pin_file))
        .route("/data/testAuthentication", get(test_authentication))
        .with_state(fake);
    serve(router).await
}

/// In-memory document store whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyDocuments {
    inner: InMemoryMedicineStore,
    pub failing: AtomicBool,
}

#[async_trait]
impl MedicineStore for FlakyDocuments {
    async fn upsert(&self, doc: NewMedicineDocument) -> anyhow::Result<StoredMedicine> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("document store offline"));
        }
        self.inner.upsert(doc).await
    }

    async fn list_newest_first(&self) -> anyhow::Result<Vec<StoredMedicine>> {
        self.inner.list_newest_first().await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.inner.ping().await
    }
}

pub struct TestApp {
    pub base_url: String,
    pub pinata_url: String,
    pub client: reqwest::Client,
    pub pinata: Arc<FakePinata>,
    pub store: Arc<AppStore>,
    pub documents: Arc<dyn MedicineStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login_admin(&self) {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "role": "admin" }))
            .send()
            .await
            .expect("login request");
        assert_eq!(resp.status(), 200);
    }
}

/// Starts the service against a fresh stand-in Pinata and an in-memory document store.
pub async fn spawn_app(seeded: bool) -> TestApp {
    spawn_app_with_documents(seeded, Arc::new(InMemoryMedicineStore::new())).await
}

pub async fn spawn_app_with_documents(seeded: bool, documents: Arc<dyn MedicineStore>) -> TestApp {
    let pinata = Arc::new(FakePinata::default());
    let pinata_url = spawn_fake_pinata(pinata.clone()).await;

    let pinning = Arc::new(
        PinataClient::new(
            PinataCredentials {
                api_key: API_KEY.to_string(),
                secret_api_key: SECRET_KEY.to_string(),
            },
            pinata_url.clone(),
            Duration::from_secs(10),
        )
        .expect("pinata client"),
    );
    let wallet = Arc::new(SimulatedWallet::new(Duration::from_millis(0)));
    let initial = if seeded {
        AppSnapshot::with_seed(sample_medicines(), sample_transactions())
    } else {
        AppSnapshot::default()
    };
    let store = Arc::new(AppStore::new(initial));
    let state = transport::http::AppState::new(store.clone(), pinning, documents.clone(), wallet);
    let base_url = serve(transport::http::create_router(state)).await;

    TestApp {
        base_url,
        pinata_url,
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("http client"),
        pinata,
        store,
        documents,
    }
}

/// 1x1 transparent PNG.
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub fn tiny_png_data_url() -> String {
    format!("data:image/png;base64,{}", TINY_PNG_BASE64)
}
