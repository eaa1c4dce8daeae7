use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ExtractError;

/// The per-call extraction input. Constructed fresh per request, never
/// persisted; doubles as the HTTP request body for `POST /extract`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionRequest {
    pub text: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub source_meta: Option<serde_json::Value>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_source() -> String {
    "unknown".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// A text span recognized as a date/time expression, paired with its
/// resolved timezone-aware timestamp. Ordered by appearance in the text;
/// the first candidate is the primary signal for the event start.
#[derive(Debug, Clone)]
pub struct TemporalCandidate {
    pub matched: String,
    pub when: DateTime<Tz>,
}

/// Person / location / organization mentions found in a text.
/// Each list is deduplicated by exact text, first-seen order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityBundle {
    pub persons: Vec<String>,
    pub locations: Vec<String>,
    pub orgs: Vec<String>,
}

/// The event record as parsed from the model's answer. Every field is
/// optional: the reconciler decides what to back-fill or default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelEvent {
    pub title: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub timezone: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub description: Option<String>,
    pub reminders: Vec<i64>,
    pub recurrence: Option<String>,
    pub confidence: Option<f64>,
}

/// The normalized record returned to the caller. `start`/`end`, when
/// present, always carry an offset; naive timestamps never cross this
/// boundary. `confidence` is always present, in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub title: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub timezone: String,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub description: String,
    pub reminders: Vec<i64>,
    pub recurrence: Option<String>,
    pub confidence: f64,
    pub raw_text_snippet: String,
    pub source: String,
    pub source_meta: Option<serde_json::Value>,
}

/// Stand-in for a calendar entry in a calendar system that does not exist
/// yet. Lives only for the duration of a single /approve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarPlaceholder {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub event: ExtractedEvent,
}

impl CalendarPlaceholder {
    /// Wrap an approved event with a generated identifier derived from the
    /// current time, matching the `evt_stub_<unix-ts>` convention.
    pub fn new(event: ExtractedEvent, user_id: Option<String>) -> Self {
        Self {
            id: format!("evt_stub_{}", Utc::now().timestamp()),
            user_id,
            event,
        }
    }
}

/// Chat-completion client abstraction (allows mocking in tests).
///
/// A single attempt per request: implementations must not retry. Any
/// transport or endpoint failure is returned as a typed `ExtractError`.
pub trait LlmClient: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> Result<String, ExtractError>;
}
