//! Theme handlers: selection and background image upload.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;

use crate::theme::{Theme, encode_data_uri};

use super::super::state::AppState;
use super::success_response;

/// Handle POST /api/theme - replace the theme wholesale.
pub async fn set_theme(State(state): State<Arc<AppState>>, Json(theme): Json<Theme>) -> Response {
    let mut form = state.form.write().await;
    form.set_theme(theme);
    success_response("theme updated")
}

/// Response from the image upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub bytes: usize,
    /// The stored `data:` URI, installed as the image theme.
    pub value: String,
}

/// Handle POST /api/theme/image - upload a background image.
///
/// The file is read fully into memory, re-encoded as a `data:` URI, and
/// installed as the image theme. No size or type restriction beyond the
/// request body limit.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut filename = String::from("unknown");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            filename = field.file_name().unwrap_or("unknown").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
            image_data = Some(bytes.to_vec());
            break;
        }
    }

    let image_bytes =
        image_data.ok_or((StatusCode::BAD_REQUEST, "No image field found".to_string()))?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    let value = encode_data_uri(mime.as_ref(), &image_bytes);

    {
        let mut form = state.form.write().await;
        form.set_theme(Theme::Image(value.clone()));
    }

    Ok(Json(UploadResponse {
        filename,
        bytes: image_bytes.len(),
        value,
    }))
}
