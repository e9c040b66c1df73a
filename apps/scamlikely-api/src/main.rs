//! Scam Likely API Server - Backend for the scam-reporting directory
//!
//! Provides REST endpoints for:
//! - Recent entities and search
//! - Report submission and moderation
//! - Disputes against published reports

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod models;
mod state;

use state::AppState;

/// Command-line arguments for the Scam Likely API
#[derive(Parser, Debug)]
#[command(name = "scamlikely-api")]
#[command(about = "Scam Likely Mini API", version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Preload the demo entity shown on the mobile screens
    #[arg(long, env = "SCAMLIKELY_SEED_DEMO")]
    seed_demo: bool,

    /// Enable verbose logging
    #[arg(short, long, env = "SCAMLIKELY_VERBOSE")]
    verbose: bool,
}

/// Builds the router with all routes and middleware
pub fn app(state: Arc<AppState>) -> Router {
    // CORS stays open for the mobile client
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/healthz", get(handlers::health))
        // Listings
        .route("/v1/recent-entities", get(handlers::recent_entities))
        .route("/v1/search", get(handlers::search))
        .route("/v1/entities/:id", get(handlers::get_entity))
        // Reports
        .route("/v1/reports", post(handlers::create_report))
        .route("/v1/reports/mine", get(handlers::my_reports))
        .route("/v1/reports/:id", get(handlers::get_report))
        .route("/v1/reports/:id/publish", post(handlers::publish_report))
        // Disputes
        .route("/v1/reports/:id/dispute", post(handlers::create_dispute))
        .route("/v1/reports/:id/disputes", get(handlers::list_disputes))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("scamlikely_api={}", log_level).parse()?)
                .add_directive(format!("scamlikely_core={}", log_level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing Scam Likely API...");
    let state = if args.seed_demo {
        AppState::with_demo_data()?
    } else {
        AppState::default()
    };
    let state = Arc::new(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting Scam Likely API on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
