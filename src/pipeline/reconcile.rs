//! Merges the model's answer with locally derived signals, or substitutes
//! the deterministic fallback record when inference was unavailable or
//! unusable. This is the only stage allowed to observe inference errors.

use chrono::DateTime;
use chrono_tz::Tz;

use super::types::{EntityBundle, ExtractedEvent, ModelEvent};
use super::ExtractError;

/// Bound on the echoed raw-text snippet, in characters.
const SNIPPET_MAX_CHARS: usize = 400;

/// Bound on the description field, in characters.
const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Fixed confidence of the locally derived fallback record.
const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Default confidence when the model omitted it and a start was established.
const CONFIDENCE_WITH_START: f64 = 0.6;

/// Default confidence when the model omitted it and no start exists.
const CONFIDENCE_WITHOUT_START: f64 = 0.2;

/// Minutes-before entry stamped on every fallback record.
const FALLBACK_REMINDER_MINUTES: i64 = 30;

/// Everything the pipeline derived locally, handed to the reconciler
/// alongside the inference outcome.
#[derive(Debug, Clone)]
pub struct LocalSignals {
    /// Normalized text.
    pub text: String,
    pub entities: EntityBundle,
    /// Pre-seeded window from the first temporal candidate.
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    /// The caller's IANA timezone name, echoed into the record.
    pub timezone: String,
    pub source: String,
    pub source_meta: Option<serde_json::Value>,
}

/// Resolve the inference outcome into the final record. Never fails:
/// any inference error becomes the deterministic fallback.
pub fn reconcile(
    outcome: Result<ModelEvent, ExtractError>,
    signals: &LocalSignals,
) -> ExtractedEvent {
    match outcome {
        Ok(model) => merge(model, signals),
        Err(err) => {
            tracing::warn!(error = %err, "inference unavailable, using local fallback");
            fallback(signals)
        }
    }
}

/// Happy path: back-fill absent start/end from the local window, stamp the
/// echo fields, default confidence only when the model omitted it.
fn merge(model: ModelEvent, signals: &LocalSignals) -> ExtractedEvent {
    let start = model
        .start
        .or_else(|| signals.start.map(|dt| dt.fixed_offset()));
    let end = model.end.or_else(|| signals.end.map(|dt| dt.fixed_offset()));

    let confidence = model
        .confidence
        .unwrap_or(if start.is_some() {
            CONFIDENCE_WITH_START
        } else {
            CONFIDENCE_WITHOUT_START
        })
        .clamp(0.0, 1.0);

    ExtractedEvent {
        title: model.title,
        start,
        end,
        timezone: model
            .timezone
            .unwrap_or_else(|| signals.timezone.clone()),
        location: model.location,
        attendees: model.attendees,
        description: truncate_chars(
            model.description.as_deref().unwrap_or_default(),
            DESCRIPTION_MAX_CHARS,
        ),
        reminders: model.reminders,
        recurrence: model.recurrence,
        confidence,
        raw_text_snippet: truncate_chars(&signals.text, SNIPPET_MAX_CHARS),
        source: signals.source.clone(),
        source_meta: signals.source_meta.clone(),
    }
}

/// Fallback path: the record is derived entirely from local signals with a
/// fixed low confidence. No hybrid with partial model output.
fn fallback(signals: &LocalSignals) -> ExtractedEvent {
    ExtractedEvent {
        title: None,
        start: signals.start.map(|dt| dt.fixed_offset()),
        end: signals.end.map(|dt| dt.fixed_offset()),
        timezone: signals.timezone.clone(),
        location: signals.entities.locations.first().cloned(),
        attendees: signals.entities.persons.clone(),
        description: truncate_chars(&signals.text, DESCRIPTION_MAX_CHARS),
        reminders: vec![FALLBACK_REMINDER_MINUTES],
        recurrence: None,
        confidence: FALLBACK_CONFIDENCE,
        raw_text_snippet: truncate_chars(&signals.text, SNIPPET_MAX_CHARS),
        source: signals.source.clone(),
        source_meta: signals.source_meta.clone(),
    }
}

/// Character-bounded truncation (multi-byte safe).
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
