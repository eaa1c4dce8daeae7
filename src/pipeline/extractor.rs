//! Orchestrates the full extraction pipeline:
//! normalize → entities + temporal candidates → prompt → LLM → reconcile.
//!
//! Constructed once at process start with explicit dependency objects and
//! shared read-only across requests. A single inference attempt per
//! request; any inference failure resolves to the local fallback, so
//! `extract` itself is infallible.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use super::entities::{bucket_entities, EntityRecognizer};
use super::normalize::normalize;
use super::parser::parse_model_response;
use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::reconcile::{reconcile, LocalSignals};
use super::temporal::{extract_temporal_candidates, scan_duration};
use super::types::{ExtractedEvent, ExtractionRequest, LlmClient, TemporalCandidate};

pub struct EventExtractor {
    llm: Box<dyn LlmClient>,
    recognizer: Box<dyn EntityRecognizer>,
}

impl EventExtractor {
    pub fn new(llm: Box<dyn LlmClient>, recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self { llm, recognizer }
    }

    /// Run the pipeline for one request. Inference failures never surface:
    /// the caller always receives a well-formed record, degraded in
    /// confidence when the model was unavailable or unusable.
    pub fn extract(&self, request: &ExtractionRequest) -> ExtractedEvent {
        let working = normalize(&request.text);
        let locale = effective_locale(request);

        let tz: Tz = request.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %request.timezone, "unknown IANA timezone, resolving in UTC");
            chrono_tz::UTC
        });
        let now = Utc::now().with_timezone(&tz);

        let entities = bucket_entities(&self.recognizer.recognize(&working));
        let candidates = extract_temporal_candidates(&working, tz, now);
        let (start, end) = seed_window(&candidates, &working);

        tracing::debug!(
            source = %request.source,
            candidates = candidates.len(),
            persons = entities.persons.len(),
            locations = entities.locations.len(),
            "local signals extracted"
        );

        let prompt = build_prompt(&working, &candidates, &entities, &locale, &request.timezone);
        let outcome = self
            .llm
            .complete(SYSTEM_PROMPT, &prompt)
            .and_then(|raw| parse_model_response(&raw));

        let signals = LocalSignals {
            text: working,
            entities,
            start,
            end,
            timezone: request.timezone.clone(),
            source: request.source.clone(),
            source_meta: request.source_meta.clone(),
        };
        reconcile(outcome, &signals)
    }
}

/// The request locale, unless it is the default and the source metadata
/// carries a detected one.
fn effective_locale(request: &ExtractionRequest) -> String {
    if request.locale == "en" {
        if let Some(detected) = request
            .source_meta
            .as_ref()
            .and_then(|meta| meta.get("locale"))
            .and_then(|v| v.as_str())
        {
            if !detected.is_empty() && detected != "en" {
                return detected.to_string();
            }
        }
    }
    request.locale.clone()
}

/// Pre-seed the event window from the first temporal candidate: end is
/// start plus the duration phrase in the text, or one hour.
fn seed_window(
    candidates: &[TemporalCandidate],
    text: &str,
) -> (Option<DateTime<Tz>>, Option<DateTime<Tz>>) {
    let Some(first) = candidates.first() else {
        return (None, None);
    };
    let start = first.when;
    let end = start + scan_duration(text).unwrap_or_else(|| Duration::hours(1));
    (Some(start), Some(end))
}
