//! HTTP transport - maps REST calls onto the gateway.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /api/v1/clients?word_to_search=<text>` — search by name.
//! - `GET /api/v1/clients/:client_id` — fetch one client.
//! - `POST /api/v1/clients` — create a client (201).
//! - `PATCH /api/v1/clients/:client_id` — apply a sparse update.
//! - `GET /health` — `{ "ok": true, "eventing": <bool> }`.
//!
//! Gateway errors keep their kind on the wire: the status comes from
//! [`GatewayError::status_code`] and the body is `{ "error": <message> }`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::client::{Client, ClientId, ClientPatch};
use crate::error::GatewayError;
use crate::gateway::Gateway;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub word_to_search: String,
}

/// Build an axum `Router` serving the client API.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/clients",
            get(search_handler).post(create_handler),
        )
        .route(
            "/api/v1/clients/:client_id",
            get(get_handler).patch(update_handler),
        )
        .with_state(gateway)
}

/// Serve the API over HTTP at the given address (e.g. `"0.0.0.0:5000"`).
pub async fn serve(gateway: Arc<Gateway>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(gateway);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health_handler(State(gateway): State<Arc<Gateway>>) -> impl IntoResponse {
    Json(json!({ "ok": true, "eventing": gateway.eventing_enabled() }))
}

async fn search_handler(
    State(gateway): State<Arc<Gateway>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match gateway.search_clients(&params.word_to_search) {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => error_response("search clients", e),
    }
}

async fn get_handler(
    State(gateway): State<Arc<Gateway>>,
    Path(client_id): Path<String>,
) -> Response {
    match gateway.get_client(&ClientId::new(client_id)) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => error_response("get client", e),
    }
}

async fn create_handler(
    State(gateway): State<Arc<Gateway>>,
    Json(client): Json<Client>,
) -> Response {
    match gateway.create_client(client) {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => error_response("create client", e),
    }
}

async fn update_handler(
    State(gateway): State<Arc<Gateway>>,
    Path(client_id): Path<String>,
    Json(patch): Json<ClientPatch>,
) -> Response {
    match gateway.update_client(&ClientId::new(client_id), &patch) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => error_response("update client", e),
    }
}

fn error_response(operation: &str, err: GatewayError) -> Response {
    error!(operation, error = %err, "request failed");
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
