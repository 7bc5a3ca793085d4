//! Webhook routes

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GitHub caps webhook payloads at 25 MB
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Serialize)]
pub struct WebhookResponse {
    ok: bool,
    event: String,
    delivery: String,
}

/// Reject deliveries whose signature does not match the loaded keys.
///
/// Runs before the handler, on the raw body bytes.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

    state.validator.validate(&parts.headers, &bytes, ip)?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

pub async fn github(headers: HeaderMap, body: Bytes) -> ApiResult<Json<WebhookResponse>> {
    let event_type = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing X-GitHub-Event header".to_string()))?;

    let delivery = github::delivery_id(&headers);

    info!(
        "Accepted {} delivery {} ({} bytes)",
        event_type,
        delivery,
        body.len()
    );

    Ok(Json(WebhookResponse {
        ok: true,
        event: event_type.to_string(),
        delivery: delivery.to_string(),
    }))
}
