//! # Vinilo - Album Receipt Generator
//!
//! Vinilo renders album metadata (title, artist, tracklist, credits,
//! background theme) as a stylized store receipt and exports it as a
//! PNG. It provides:
//!
//! - **Form state**: the single owned receipt form with a command-style
//!   mutation API and a derived total-time field
//! - **Projection**: a pure view of the form as a line document, with
//!   all user-visible fallbacks
//! - **Rasterizer**: background themes (paper, solid, gradient, image)
//!   and Spleen bitmap-font text on an RGBA canvas
//! - **Export pipeline**: busy-guarded PNG capture with download
//!   filename derivation
//! - **HTTP server**: the browser form UI and its JSON API
//!
//! ## Quick Start
//!
//! ```
//! use vinilo::{
//!     form::ReceiptForm,
//!     receipt::{self, RandomCode},
//!     render::{self, BackgroundSpec},
//!     theme::WHITE,
//! };
//!
//! // Build a form and edit it through its commands
//! let mut form = ReceiptForm::new();
//! let id = form.add_track();
//! form.update_track(id, vinilo::form::TrackField::Duration, "2:49".into());
//! assert_eq!(form.total_time(), "2:49");
//!
//! // Project and rasterize
//! let view = receipt::project(&form, &RandomCode);
//! let canvas = render::render_view(&view, &BackgroundSpec::Paper, 1, WHITE);
//! let png = render::encode_png(&canvas)?;
//! assert!(!png.is_empty());
//! # Ok::<(), vinilo::error::ViniloError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form`] | Receipt form state and mutation commands |
//! | [`receipt`] | Pure projection to the line document |
//! | [`theme`] | Background themes and payload parsing |
//! | [`render`] | RGBA rasterizer and PNG encoding |
//! | [`export`] | Capture boundary and export guard |
//! | [`server`] | axum web UI and JSON API |
//! | [`error`] | Error types |

pub mod error;
pub mod export;
pub mod form;
pub mod receipt;
pub mod render;
pub mod server;
pub mod theme;

// Re-exports for convenience
pub use error::ViniloError;
pub use form::ReceiptForm;
pub use theme::Theme;
