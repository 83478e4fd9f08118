mod common;

use common::{gateway_signature, test_config, TestApp};
use serde_json::{json, Value};

fn save_body(amount: f64) -> Value {
    json!({
        "full_name": "Asha Rao",
        "email": "asha@example.com",
        "phone": "9999999999",
        "dob": "1990-04-12",
        "amount": amount
    })
}

#[tokio::test]
async fn self_order_save_round_trip_then_tampered_amount_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/orders/qr", app.address))
        .json(&json!({ "amount": 500, "note": "Consult" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let order: Value = resp.json().await.unwrap();
    let order_id = order["order_id"].as_str().unwrap().to_string();
    let token = order["verification_token"].as_str().unwrap().to_string();
    assert!(order["upi_link"].as_str().unwrap().contains("am=500.00"));
    assert!(!order["qr_image_base64"].as_str().unwrap().is_empty());

    // Save with the issued token at the issued amount succeeds.
    let mut body = save_body(500.0);
    body["order_id"] = json!(order_id);
    body["verification_token"] = json!(token);

    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let saved: Value = resp.json().await.unwrap();
    assert!(!saved["id"].as_str().unwrap().is_empty());

    // Same token with a different amount is tampering.
    let mut body = save_body(600.0);
    body["order_id"] = json!(order_id);
    body["verification_token"] = json!(token);

    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert_eq!(app.store.records().await.len(), 1);
}

#[tokio::test]
async fn save_rejects_missing_and_invalid_fields() {
    let app = TestApp::spawn().await;

    // Missing email is rejected at deserialization.
    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&json!({ "full_name": "Asha Rao", "dob": "1990-04-12", "amount": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    // Non-positive amount is rejected by the recorder.
    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&save_body(0.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    // Unknown fields never pass through silently.
    let mut body = save_body(500.0);
    body["upi_handle"] = json!("asha@bank");
    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    assert!(app.store.records().await.is_empty());
}

#[tokio::test]
async fn confirm_twice_creates_two_distinct_records() {
    let app = TestApp::spawn().await;

    let body = json!({
        "email": "asha@example.com",
        "reference_number": "UTR-1234",
        "amount": 500
    });

    let first: Value = app
        .client
        .post(format!("{}/payments/confirm", app.address))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = app
        .client
        .post(format!("{}/payments/confirm", app.address))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_ne!(first["id"], second["id"]);
    assert!(!first["payment_confirmed_at"].as_str().unwrap().is_empty());

    let records = app.store.records().await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn confirm_with_mismatched_token_writes_nothing() {
    let app = TestApp::spawn().await;

    let order: Value = app
        .client
        .post(format!("{}/orders/qr", app.address))
        .json(&json!({ "amount": 500 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let resp = app
        .client
        .post(format!("{}/payments/confirm", app.address))
        .json(&json!({
            "email": "asha@example.com",
            "reference_number": "UTR-1234",
            "amount": 600,
            "order_id": order["order_id"],
            "verification_token": order["verification_token"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert!(app.store.records().await.is_empty());
}

#[tokio::test]
async fn verify_endpoint_judges_gateway_claims() {
    let app = TestApp::spawn().await;

    let resp: Value = app
        .client
        .post(format!("{}/payments/verify", app.address))
        .json(&json!({
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": gateway_signature("order_1", "pay_1")
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["authentic"], json!(true));

    let resp: Value = app
        .client
        .post(format!("{}/payments/verify", app.address))
        .json(&json!({
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": "forged"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["authentic"], json!(false));
}

#[tokio::test]
async fn unready_store_returns_retryable_unavailable() {
    let app = TestApp::spawn().await;
    app.store.set_ready(false);

    let resp = app
        .client
        .post(format!("{}/payments", app.address))
        .json(&save_body(500.0))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 503);
    assert!(resp.headers().contains_key("retry-after"));
    assert!(app.store.records().await.is_empty());
}

#[tokio::test]
async fn gateway_order_without_credentials_is_unavailable() {
    let mut config = test_config();
    config.gateway.key_id = String::new();
    let app = TestApp::spawn_with(config).await;

    let resp = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({ "amount": 500 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn missing_token_secret_refuses_self_orders() {
    let mut config = test_config();
    config.token.secret = secrecy::Secret::new(String::new());
    let app = TestApp::spawn_with(config).await;

    let resp = app
        .client
        .post(format!("{}/orders/qr", app.address))
        .json(&json!({ "amount": 500 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 503);
}
