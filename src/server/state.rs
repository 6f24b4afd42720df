//! Server state and configuration.

use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::export::{CaptureOptions, Exporter, RasterCapture};
use crate::form::ReceiptForm;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    /// The single receipt form session.
    pub form: RwLock<ReceiptForm>,
    /// Busy-guarded 2x export pipeline.
    pub exporter: Exporter,
    /// Unguarded 1x capture for live previews.
    pub preview: RasterCapture,
    pub preview_options: CaptureOptions,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Self {
            config,
            boot_time,
            form: RwLock::new(ReceiptForm::demo()),
            exporter: Exporter::raster(),
            preview: RasterCapture::new(),
            preview_options: CaptureOptions {
                scale: 1,
                ..Default::default()
            },
        }
    }
}
