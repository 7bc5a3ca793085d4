//! Webhook Validator API Server

use common::{Config, WebhookConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("github=info".parse()?)
                .add_directive("api=debug".parse()?),
        )
        .init();

    info!("Starting webhook validator API");

    // Load configuration
    let config = Config::from_env();

    let webhook_config = match &config.webhook_config {
        Some(path) => WebhookConfig::load(path)?,
        None => WebhookConfig::default(),
    };
    let default_key_file = config
        .secret_key_file
        .as_deref()
        .or(webhook_config.secret_key_file.as_deref());

    // Any unreadable key file stops startup
    let keys = github::load_key_dictionary(
        default_key_file,
        &webhook_config.builders,
        github::label_field(&config.label_field),
    )
    .await?;

    if keys.is_empty() {
        info!("No webhook keys configured, only unsigned deliveries will be accepted");
    } else {
        let mut labels: Vec<&str> = keys.labels().collect();
        labels.sort_unstable();
        info!("Webhook keys loaded for: {}", labels.join(", "));
    }

    // Create app state
    let state = Arc::new(AppState::new(keys));

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
