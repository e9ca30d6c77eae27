//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use client_gateway::{http, Gateway, GatewayConfig, InMemoryDocumentStore, InMemoryQueue};
use serde_json::{json, Value};

/// Bind to port 0 and return the actual address.
async fn start_server(eventing: bool) -> (InMemoryDocumentStore, InMemoryQueue, String) {
    let store = InMemoryDocumentStore::new();
    let queue = InMemoryQueue::new();
    let gateway = Arc::new(Gateway::new(
        &GatewayConfig::default().with_eventing(eventing),
        Arc::new(store.clone()),
        Arc::new(queue.clone()),
    ));

    let app = http::router(gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (store, queue, format!("http://{addr}"))
}

fn ana_body() -> Value {
    json!({
        "id": "ana-1",
        "name": "Ana",
        "location": "NY",
        "email": "a@x.com",
        "phone_number": 555
    })
}

#[tokio::test]
async fn health_reports_write_path() {
    let (_, _, base) = start_server(true).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "eventing": true }));
}

#[tokio::test]
async fn create_get_search_and_patch() {
    let (_, _, base) = start_server(false).await;
    let client = reqwest::Client::new();

    // Create
    let resp = client
        .post(format!("{base}/api/v1/clients"))
        .json(&ana_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, ana_body());

    // Get
    let resp = client
        .get(format!("{base}/api/v1/clients/ana-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, ana_body());

    // Search
    let resp = client
        .get(format!("{base}/api/v1/clients?word_to_search=AN"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([ana_body()]));

    // Patch
    let resp = client
        .patch(format!("{base}/api/v1/clients/ana-1"))
        .json(&json!({ "location": "LA" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["location"], "LA");
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn create_without_id_gets_one() {
    let (_, _, base) = start_server(false).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/clients"))
        .json(&json!({
            "name": "Bob",
            "location": "SF",
            "email": "b@x.com",
            "phone_number": 777
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let resp = client
        .get(format!("{base}/api/v1/clients/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn eventing_create_is_not_persisted() {
    let (store, queue, base) = start_server(true).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/clients"))
        .json(&ana_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    assert_eq!(queue.len(), 1);
    assert_eq!(store.count("clients"), 0);

    let resp = client
        .get(format!("{base}/api/v1/clients/ana-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn error_kinds_map_to_distinct_statuses() {
    let (store, _, base) = start_server(false).await;
    let client = reqwest::Client::new();

    // Not found
    let resp = client
        .get(format!("{base}/api/v1/clients/nobody"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "client not found: nobody");

    // Cleared field
    let resp = client
        .patch(format!("{base}/api/v1/clients/nobody"))
        .json(&json!({ "name": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Store down on read, then on write
    store.set_offline(true);
    let resp = client
        .get(format!("{base}/api/v1/clients/ana-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    let resp = client
        .post(format!("{base}/api/v1/clients"))
        .json(&ana_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn unknown_patch_field_is_rejected() {
    let (_, _, base) = start_server(false).await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(format!("{base}/api/v1/clients/ana-1"))
        .json(&json!({ "id": "other" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
