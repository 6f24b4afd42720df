//! # Error Types
//!
//! This module defines error types used throughout the vinilo library.

use thiserror::Error;

/// Main error type for vinilo operations
#[derive(Debug, Error)]
pub enum ViniloError {
    /// Theme resolution errors (denied remote fetches, bad payloads)
    #[error("Theme error: {0}")]
    Theme(String),

    /// Receipt rasterization errors
    #[error("Render error: {0}")]
    Render(String),

    /// Export capture errors
    #[error("Capture error: {0}")]
    Capture(String),

    /// Image decoding/encoding errors
    #[error("Image error: {0}")]
    Image(String),

    /// HTTP-level errors (server bind, remote image fetch)
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
