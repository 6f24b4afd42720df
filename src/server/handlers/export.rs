//! Preview and export handlers.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::export::Capture;
use crate::receipt::{self, RandomCode};

use super::super::state::AppState;
use super::error_response;

/// Handle GET /api/receipt/preview - render the current state as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let view = {
        let form = state.form.read().await;
        receipt::project(&form, &RandomCode)
    };

    let image = state
        .preview
        .capture(&view, &state.preview_options)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render preview: {}", e),
            )
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], image.png))
}

/// Handle POST /api/receipt/export - capture at 2x and deliver as a
/// download.
///
/// While a capture is in flight, additional triggers are ignored with a
/// 409. Capture failure is a transient 500; state is unchanged and the
/// user may retry immediately.
pub async fn export(State(state): State<Arc<AppState>>) -> Response {
    let (view, stem) = {
        let form = state.form.read().await;
        let title = if form.title.is_empty() { "album" } else { form.title.as_str() };
        (
            receipt::project(&form, &RandomCode),
            format!("{title}-receipt"),
        )
    };

    match state.exporter.export(&view, &stem).await {
        Ok(Some(file)) => (
            [
                (header::CONTENT_TYPE, "image/png".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.image.png,
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::CONFLICT, "An export is already in progress"),
        Err(e) => {
            eprintln!("[export] capture failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Export failed: {}", e),
            )
        }
    }
}
