//! # HTTP Server for the Receipt Form
//!
//! Serves the browser form and the JSON API it drives: form state
//! commands, theme selection and image upload, live PNG preview, and
//! the export-as-download endpoint.
//!
//! ## Usage
//!
//! ```bash
//! vinilo serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser to build a receipt.

mod handlers;
mod state;
mod static_files;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::ViniloError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use vinilo::server::{ServerConfig, serve};
///
/// # async fn example() -> Result<(), vinilo::error::ViniloError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), ViniloError> {
    let app_state = Arc::new(AppState::new(config.clone()));

    let app = Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Form API
        .route("/api/form", get(handlers::form::snapshot))
        .route("/api/form/field", post(handlers::form::set_field))
        .route("/api/form/demo", post(handlers::form::load_demo))
        .route("/api/form/track", post(handlers::form::add_track))
        .route("/api/form/track/:id", post(handlers::form::update_track))
        .route(
            "/api/form/track/:id/remove",
            post(handlers::form::remove_track),
        )
        // Theme API (50MB limit for image uploads)
        .route("/api/theme", post(handlers::theme::set_theme))
        .route(
            "/api/theme/image",
            post(handlers::theme::upload_image).layer(DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        // Receipt API
        .route("/api/receipt/preview", get(handlers::export::preview))
        .route("/api/receipt/export", post(handlers::export::export))
        .with_state(app_state);

    println!("Vinilo HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!();
    println!(
        "Open http://{}/ in your browser to build a receipt",
        config.listen_addr
    );
    println!();

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            ViniloError::Http(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ViniloError::Http(format!("Server error: {}", e)))?;

    Ok(())
}
