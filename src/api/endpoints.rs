//! HTTP handlers. The extraction pipeline is CPU-bound plus one blocking
//! HTTP call, so it runs under `spawn_blocking` off the async workers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::DateTime;

use crate::api::error::ApiError;
use crate::api::types::{ApproveRequest, ApproveResponse};
use crate::pipeline::types::{CalendarPlaceholder, ExtractedEvent, ExtractionRequest};
use crate::state::AppState;

/// `POST /extract`: run the pipeline on one text snippet.
///
/// Inference failures do not surface here: the response is always a
/// well-formed record, degraded in confidence when the model was
/// unavailable.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractionRequest>,
) -> Result<Json<ExtractedEvent>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }

    let event = tokio::task::spawn_blocking(move || state.extractor.extract(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?;

    Ok(Json(event))
}

/// `POST /approve`: wrap an accepted event in a calendar placeholder.
/// Stub for the calendar integration that does not exist yet.
pub async fn approve(Json(request): Json<ApproveRequest>) -> Json<ApproveResponse> {
    let placeholder = CalendarPlaceholder::new(request.event, request.user_id);
    Json(ApproveResponse {
        status: "ok",
        calendar_event: placeholder,
    })
}

/// `GET /suggestions_stub`: static sample suggestions for frontend dev.
pub async fn suggestions_stub() -> Json<Vec<ExtractedEvent>> {
    Json(vec![ExtractedEvent {
        title: Some("Dentist appointment".into()),
        start: DateTime::parse_from_rfc3339("2025-11-10T14:00:00+00:00").ok(),
        end: DateTime::parse_from_rfc3339("2025-11-10T14:30:00+00:00").ok(),
        timezone: "Europe/Budapest".into(),
        location: Some("Smile Dental, Main St 10".into()),
        attendees: vec!["me@example.com".into()],
        description: "Routine cleaning".into(),
        reminders: vec![30],
        recurrence: None,
        confidence: 0.92,
        raw_text_snippet: "Your appointment is on Nov 10 at 3pm...".into(),
        source: "stub".into(),
        source_meta: None,
    }])
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
