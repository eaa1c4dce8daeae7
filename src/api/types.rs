//! Request/response DTOs for the HTTP boundary. The extraction request
//! body itself is `pipeline::types::ExtractionRequest`.

use serde::{Deserialize, Serialize};

use crate::pipeline::types::{CalendarPlaceholder, ExtractedEvent};

/// Body of `POST /approve`: an event the user accepted, to be handed to
/// the (not yet existing) calendar integration.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub event: ExtractedEvent,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub status: &'static str,
    pub calendar_event: CalendarPlaceholder,
}
