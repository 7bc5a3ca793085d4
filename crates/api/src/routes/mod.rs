//! API routes

pub mod health;
pub mod webhooks;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

/// Build the API router.
///
/// Webhook routes sit behind signature validation; nothing else does.
pub fn router(state: Arc<AppState>) -> Router {
    let webhook_router = Router::new()
        .route("/webhooks/github", post(webhooks::github))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            webhooks::validate,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(webhook_router)
        .with_state(state)
}
