//! Integration tests for the HTTP surface.
//!
//! These tests drive the full router over an in-memory SQLite store and
//! verify the status codes and body shapes of the external contract.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use billing_hex::{InvoiceService, PaymentService, inbound::HttpServer};
use billing_store::SqliteStore;

/// Helper to create a test router over a fresh in-memory store.
async fn test_app() -> Router {
    let store = Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap());
    let server = HttpServer::new(
        PaymentService::new(store.clone()),
        InvoiceService::new(store),
    );
    server.router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const CREATE_BODY: &str = r#"{
    "order_id": "ORD-001",
    "user_id": 123,
    "total_amount": 112.0,
    "method": "tarjeta_credito"
}"#;

#[tokio::test]
async fn test_health() {
    let app = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "billing-api");
}

#[tokio::test]
async fn test_create_payment_returns_201_with_record() {
    let app = test_app().await;

    let response = app.oneshot(post("/payments", CREATE_BODY)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["order_id"], "ORD-001");
    assert_eq!(json["user_id"], 123);
    assert_eq!(json["total_amount"], 112.0);
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_create_payment_duplicate_order_returns_409() {
    let app = test_app().await;

    let first = app.clone().oneshot(post("/payments", CREATE_BODY)).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.oneshot(post("/payments", CREATE_BODY)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["code"], 409);
    assert!(json["error"].as_str().unwrap().contains("ORD-001"));
}

#[tokio::test]
async fn test_create_payment_missing_fields_returns_400() {
    let app = test_app().await;

    let response = app
        .oneshot(post("/payments", r#"{"order_id": "ORD-001"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json.get("error").is_some());
    assert_eq!(json["code"], 400);
}

#[tokio::test]
async fn test_process_unknown_payment_returns_404() {
    let app = test_app().await;

    let response = app.oneshot(post("/payments/42/process", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_lifecycle_over_http() {
    let app = test_app().await;

    // Create
    let created = app.clone().oneshot(post("/payments", CREATE_BODY)).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let payment = body_json(created).await;
    let id = payment["id"].as_i64().unwrap();

    // Process
    let processed = app
        .clone()
        .oneshot(post(&format!("/payments/{}/process", id), ""))
        .await
        .unwrap();
    assert_eq!(processed.status(), StatusCode::OK);
    let result = body_json(processed).await;
    assert_eq!(result["payment_id"], id);
    assert_eq!(result["status"], "approved");
    let reference = result["reference"].as_str().unwrap();
    assert!(reference.starts_with("TXN-"));
    assert_eq!(reference.len(), "TXN-".len() + 6);

    // Re-processing is refused.
    let again = app
        .clone()
        .oneshot(post(&format!("/payments/{}/process", id), ""))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    // Lookups see the approved state.
    let by_id = app
        .clone()
        .oneshot(get(&format!("/payments/{}", id)))
        .await
        .unwrap();
    assert_eq!(by_id.status(), StatusCode::OK);
    assert_eq!(body_json(by_id).await["status"], "approved");

    let by_order = app
        .clone()
        .oneshot(get("/payments/order/ORD-001"))
        .await
        .unwrap();
    assert_eq!(by_order.status(), StatusCode::OK);
    assert_eq!(body_json(by_order).await["id"], id);

    let listed = app.oneshot(get("/payments")).await.unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let list = body_json(listed).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_payment_unknown_returns_404() {
    let app = test_app().await;

    let by_id = app.clone().oneshot(get("/payments/42")).await.unwrap();
    assert_eq!(by_id.status(), StatusCode::NOT_FOUND);

    let by_order = app.oneshot(get("/payments/order/ORD-999")).await.unwrap();
    assert_eq!(by_order.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoice_lifecycle_over_http() {
    let app = test_app().await;

    let created = app.clone().oneshot(post("/payments", CREATE_BODY)).await.unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    // Not approved yet: rejected with 400.
    let premature = app
        .clone()
        .oneshot(post(
            "/invoices",
            &format!(r#"{{"payment_id": {}, "items": []}}"#, id),
        ))
        .await
        .unwrap();
    assert_eq!(premature.status(), StatusCode::BAD_REQUEST);
    let rejection = body_json(premature).await;
    assert_eq!(rejection["error"], "payment not found or not approved");

    app.clone()
        .oneshot(post(&format!("/payments/{}/process", id), ""))
        .await
        .unwrap();

    // Approved: invoice issues with the default 0.12 rate.
    let issued = app
        .clone()
        .oneshot(post(
            "/invoices",
            &format!(
                r#"{{"payment_id": {}, "items": [{{"name": "Producto A", "quantity": 2, "price": 25.0}}]}}"#,
                id
            ),
        ))
        .await
        .unwrap();
    assert_eq!(issued.status(), StatusCode::CREATED);
    let invoice = body_json(issued).await;
    assert_eq!(invoice["payment_id"], id);
    assert_eq!(invoice["subtotal"], 100.0);
    assert_eq!(invoice["tax"], 12.0);
    assert_eq!(invoice["total_amount"], 112.0);
    let number = invoice["number"].as_str().unwrap().to_string();
    assert!(number.starts_with("FAC-"));

    // Round trip by number.
    let fetched = app
        .clone()
        .oneshot(get(&format!("/invoices/{}", number)))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = body_json(fetched).await;
    assert_eq!(fetched["items"][0]["name"], "Producto A");

    // A second invoice for the same payment is refused.
    let duplicate = app
        .clone()
        .oneshot(post(
            "/invoices",
            &format!(r#"{{"payment_id": {}, "items": []}}"#, id),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let listed = app.oneshot(get("/invoices")).await.unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_unknown_invoice_returns_404() {
    let app = test_app().await;

    let response = app.oneshot(get("/invoices/FAC-20250114-0000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_flow_over_http() {
    let app = test_app().await;

    let body = r#"{
        "order_id": "ORD-100",
        "user_id": 7,
        "total_amount": 50.0,
        "method": "card",
        "items": [{"name": "X", "quantity": 1, "price": 50.0}]
    }"#;

    let response = app.clone().oneshot(post("/payments/complete", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["payment"]["status"], "approved");
    assert!(
        json["transaction"]["reference"]
            .as_str()
            .unwrap()
            .starts_with("TXN-")
    );
    assert_eq!(json["invoice"]["subtotal"], 44.64);
    assert_eq!(json["invoice"]["tax"], 5.36);

    // Same order again: the first step's conflict is preserved.
    let again = app.oneshot(post("/payments/complete", body)).await.unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);
}
