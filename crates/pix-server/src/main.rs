//! pix-server
//!
//! Axum-based HTTP surface over `pix-core`: BR Code generation, decoding,
//! Pix key and CPF validation. Validation failures come back as 400 with
//! a machine-readable `code`, never as a half-built payload.

mod config;
mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{create_payload, decode_payload, health_check, validate_cpf, validate_key};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr;
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("pix-server listening on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /api/pix/payload         - Generate BR Code");
    tracing::info!("  POST /api/pix/payload/decode  - Decode and verify BR Code");
    tracing::info!("  POST /api/pix/keys/validate   - Pix key shape check");
    tracing::info!("  POST /api/cpf/validate        - CPF check digits");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/api/pix/payload", post(create_payload))
        .route("/api/pix/payload/decode", post(decode_payload))
        .route("/api/pix/keys/validate", post(validate_key))
        .route("/api/cpf/validate", post(validate_cpf))
        .layer(TraceLayer::new_for_http());

    if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.with_state(state)
}
