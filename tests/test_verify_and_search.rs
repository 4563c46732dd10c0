//! Scan verification, expiry tagging and search against the seeded registry.

mod common;

use common::spawn_app;
use serde_json::{json, Value};

async fn verify(app: &common::TestApp, payload: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let resp = app
        .client
        .post(app.url("/api/verify"))
        .json(&json!({ "payload": payload }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_matches_seeded_records() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(true).await;

    let all: Value = app
        .client
        .get(app.url("/api/registry/medicines"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all["data"].as_array().map(|a| a.len()), Some(3));

    let para: Value = app
        .client
        .get(app.url("/api/registry/medicines?q=PARA"))
        .send()
        .await?
        .json()
        .await?;
    let para = para["data"].as_array().ok_or("expected array")?;
    assert_eq!(para.len(), 1);
    assert_eq!(para[0]["name"], "Paracetamol");

    let by_maker: Value = app
        .client
        .get(app.url("/api/registry/medicines?q=healthpharm"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(by_maker["data"][0]["batchNumber"], "IBUP2023001");

    let none: Value = app
        .client
        .get(app.url("/api/registry/medicines?q=zzz"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(none["data"].as_array().map(|a| a.len()), Some(0));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_verify_registered_payload() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(false).await;
    app.login_admin().await;

    let body: Value = app
        .client
        .post(app.url("/api/registry/medicines"))
        .json(&json!({
            "name": "Cetirizine",
            "batchNumber": "CET-2030",
            "expiryDate": "2030-01-01",
            "manufacturerAddress": "0xfeed"
        }))
        .send()
        .await?
        .json()
        .await?;
    let id = body["data"]["id"].as_str().ok_or("missing id")?.to_string();
    let payload = body["data"]["qrPayload"].as_str().ok_or("missing payload")?.to_string();

    let result = verify(&app, &payload).await?;
    assert_eq!(result["status"], "valid");
    assert_eq!(result["isValid"], true);
    assert_eq!(result["medicine"]["id"], id.as_str());

    // CRLF line endings from a scanner still match.
    let result = verify(&app, &payload.replace('\n', "\r\n")).await?;
    assert_eq!(result["status"], "valid");

    // Any edited field breaks the match.
    let tampered = payload.replace("2030-01-01", "2031-01-01");
    let result = verify(&app, &tampered).await?;
    assert_eq!(result["status"], "invalid");
    assert_eq!(result["isValid"], false);
    assert!(result.get("medicine").is_none());

    let result = verify(&app, "hello world").await?;
    assert_eq!(result["status"], "invalid");

    // Tagging as expired flips the outcome; tagging twice is harmless.
    for _ in 0..2 {
        let resp = app
            .client
            .post(app.url(&format!("/api/registry/medicines/{}/expire", id)))
            .send()
            .await?;
        assert_eq!(resp.status(), 200);
    }
    let result = verify(&app, &payload).await?;
    assert_eq!(result["status"], "expired");
    assert_eq!(result["isValid"], false);

    let txs = app.store.transactions().await;
    assert_eq!(txs[0].message, "Scanned medicine is expired");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reused_batch_verifies_against_active_record() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(false).await;
    app.login_admin().await;
    let input = json!({
        "name": "Cetirizine",
        "batchNumber": "CET-REUSE",
        "expiryDate": "2030-01-01",
        "manufacturerAddress": "0xfeed"
    });

    let first: Value = app
        .client
        .post(app.url("/api/registry/medicines"))
        .json(&input)
        .send()
        .await?
        .json()
        .await?;
    let first_id = first["data"]["id"].as_str().ok_or("missing id")?.to_string();
    let resp = app
        .client
        .post(app.url(&format!("/api/registry/medicines/{}/expire", first_id)))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/api/registry/medicines"))
        .json(&input)
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let second: Value = resp.json().await?;
    let second_id = second["data"]["id"].as_str().ok_or("missing id")?.to_string();
    assert_ne!(first_id, second_id);
    let payload = second["data"]["qrPayload"].as_str().ok_or("missing payload")?.to_string();

    let result = verify(&app, &payload).await?;
    assert_eq!(result["status"], "valid");
    assert_eq!(result["medicine"]["id"], second_id.as_str());

    let found: Value = app
        .client
        .get(app.url("/api/registry/batches/CET-REUSE"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found["data"]["id"], second_id.as_str());
    assert_eq!(found["data"]["expired"], false);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_seeded_past_expiry_is_reported_expired() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(true).await;
    let amox = app
        .store
        .medicine_by_batch("AMOX2023001")
        .await
        .ok_or("seed missing")?;
    let payload = amox.qr_payload.ok_or("seed has no payload")?;

    let result = verify(&app, &payload).await?;
    assert_eq!(result["status"], "expired");
    assert_eq!(result["medicine"]["name"], "Amoxicillin");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expire_requires_admin_and_known_id() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(true).await;

    let resp = app
        .client
        .post(app.url("/api/registry/medicines/1/expire"))
        .send()
        .await?;
    assert_eq!(resp.status(), 403);

    app.login_admin().await;
    let resp = app
        .client
        .post(app.url("/api/registry/medicines/missing/expire"))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);

    app.client.post(app.url("/api/auth/logout")).send().await?;
    let session: Value = app
        .client
        .get(app.url("/api/auth/session"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(session["data"]["isAuthenticated"], false);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_reports_document_store() -> Result<(), Box<dyn std::error::Error>> {
    let app = spawn_app(false).await;
    let resp = app.client.get(app.url("/health")).send().await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["medicines"], 0);
    Ok(())
}
