//! Form state handlers: snapshot and mutation commands.

use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::form::{Field, ReceiptForm, TrackEntry, TrackField};

use super::super::state::AppState;
use super::success_response;

/// Snapshot of the form plus the derived total, for the frontend.
#[derive(Debug, Serialize)]
pub struct FormSnapshot<'a> {
    #[serde(flatten)]
    form: &'a ReceiptForm,
    derived_total: String,
}

/// Handle GET /api/form - current state.
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let form = state.form.read().await;
    let snapshot = FormSnapshot {
        form: &form,
        derived_total: form.total_time(),
    };
    Json(serde_json::to_value(&snapshot).unwrap_or_default())
}

/// Request body for scalar field updates.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: Field,
    pub value: String,
}

/// Handle POST /api/form/field - replace one scalar field.
pub async fn set_field(
    State(state): State<Arc<AppState>>,
    Json(update): Json<FieldUpdate>,
) -> Response {
    let mut form = state.form.write().await;
    form.set_field(update.field, update.value);
    success_response("field updated")
}

/// Handle POST /api/form/demo - reload the seeded demo album.
pub async fn load_demo(State(state): State<Arc<AppState>>) -> Response {
    let mut form = state.form.write().await;
    let revision = form.revision;
    *form = ReceiptForm::demo();
    // Keep the revision monotonic across the reset.
    form.revision = revision + 1;
    success_response("demo loaded")
}

/// Handle POST /api/form/track - append an empty track.
pub async fn add_track(State(state): State<Arc<AppState>>) -> Json<TrackEntry> {
    let mut form = state.form.write().await;
    let id = form.add_track();
    let track = form
        .tracks
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .unwrap_or(TrackEntry {
            id,
            title: String::new(),
            duration: String::new(),
            featuring: String::new(),
        });
    Json(track)
}

/// Request body for track field updates.
#[derive(Debug, Deserialize)]
pub struct TrackUpdate {
    pub field: TrackField,
    pub value: String,
}

/// Handle POST /api/form/track/:id - update one track field.
///
/// An unknown id is a benign no-op and still reports success.
pub async fn update_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<TrackUpdate>,
) -> Response {
    let mut form = state.form.write().await;
    form.update_track(id, update.field, update.value);
    success_response("track updated")
}

/// Handle POST /api/form/track/:id/remove - remove a track.
///
/// An unknown id is a benign no-op and still reports success.
pub async fn remove_track(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    let mut form = state.form.write().await;
    form.remove_track(id);
    success_response("track removed")
}
