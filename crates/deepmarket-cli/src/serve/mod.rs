//! Local web server for report preview and download.
//!
//! Every request rebuilds the report from scratch; nothing is cached
//! between the preview page and the download.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - form and query types
//! - `templates` - HTML rendering

mod handlers;
mod models;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use deepmarket_core::{Config, QueryClient, ReportBuilder};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// Report pipeline over the shared query client.
    pub builder: ReportBuilder<QueryClient>,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the preview server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether to open the browser automatically.
    pub open_browser: bool,
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Build the router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Topic form
        .route("/", get(handlers::home))
        // Report preview
        .route("/report", post(handlers::report_from_form))
        .route("/report/{topic}", get(handlers::report_page))
        // Downloadable document
        .route("/download/{topic}", get(handlers::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server.
///
/// The query client is created up front so a missing API key stops the
/// server before it binds.
pub async fn start_server(
    config: Config,
    serve: ServeConfig,
) -> color_eyre::Result<()> {
    let client = QueryClient::new(&config)?;
    let state = Arc::new(AppState {
        builder: ReportBuilder::new(client),
    });

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], serve.port));
    let url = format!("http://localhost:{}", serve.port);

    info!(%addr, "Starting DeepMarket preview server");
    println!("DeepMarket: {}", url);
    println!("Press Ctrl+C to stop\n");

    if serve.open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "Could not open browser");
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
