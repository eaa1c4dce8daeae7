//! Composes the extraction instruction sent to the chat-completion
//! endpoint. Pure and deterministic given identical inputs.

use super::types::{EntityBundle, TemporalCandidate};

pub const SYSTEM_PROMPT: &str = "You are an assistant that extracts a single calendar/todo event \
from noisy text and returns strict JSON.";

/// One worked example mapping sample text to the expected JSON answer.
const WORKED_EXAMPLE: &str = r#"Example:
Text: "Hi Anna — dentist next Wed at 3pm, 30 minutes. See you!"

-> {
  "title": "Dentist appointment",
  "start": "2025-11-12T15:00:00+01:00",
  "end": "2025-11-12T15:30:00+01:00",
  "timezone": "Europe/Budapest",
  "location": null,
  "attendees": ["Anna"],
  "description": "From message: Hi Anna — dentist next Wed at 3pm, 30 minutes.",
  "reminders": [30],
  "recurrence": null,
  "confidence": 0.9
}"#;

/// Build the extraction prompt: output schema, locale/timezone context,
/// temporal candidate hints, the entity bundle, the text itself, one
/// worked example, and the JSON-only instruction.
pub fn build_prompt(
    text: &str,
    candidates: &[TemporalCandidate],
    entities: &EntityBundle,
    locale: &str,
    timezone: &str,
) -> String {
    let temporal_info = if candidates.is_empty() {
        "none".to_string()
    } else {
        candidates
            .iter()
            .map(|c| format!("- '{}' -> {}", c.matched, c.when.to_rfc3339()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    // EntityBundle has a fixed field order, so this stays deterministic.
    let entities_info =
        serde_json::to_string(entities).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Extract a single event or todo from the text below. Always return valid JSON with keys:
title, start (ISO tz), end (ISO tz or null), timezone, location (or null), attendees (list), description, reminders (list minutes), recurrence (null or RFC-rrule), confidence (0.0-1.0)

Locale: {locale}
Timezone (user): {timezone}

Temporal candidates found:
{temporal_info}

Entities:
{entities_info}

Text:
"""{text}"""

{WORKED_EXAMPLE}

Return ONLY the JSON object (no explanation)."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn sample_candidate() -> TemporalCandidate {
        let tz: Tz = "Europe/Budapest".parse().unwrap();
        TemporalCandidate {
            matched: "next Wed at 3pm".into(),
            when: tz.with_ymd_and_hms(2025, 11, 12, 15, 0, 0).unwrap(),
        }
    }

    fn sample_entities() -> EntityBundle {
        EntityBundle {
            persons: vec!["Anna".into()],
            locations: vec![],
            orgs: vec![],
        }
    }

    #[test]
    fn prompt_embeds_text_and_context() {
        let prompt = build_prompt(
            "dentist next Wed at 3pm",
            &[sample_candidate()],
            &sample_entities(),
            "en",
            "Europe/Budapest",
        );
        assert!(prompt.contains("dentist next Wed at 3pm"));
        assert!(prompt.contains("Locale: en"));
        assert!(prompt.contains("Timezone (user): Europe/Budapest"));
    }

    #[test]
    fn prompt_lists_temporal_hints_with_iso_timestamps() {
        let prompt = build_prompt(
            "dentist next Wed at 3pm",
            &[sample_candidate()],
            &sample_entities(),
            "en",
            "Europe/Budapest",
        );
        assert!(prompt.contains("- 'next Wed at 3pm' -> 2025-11-12T15:00:00+01:00"));
    }

    #[test]
    fn prompt_says_none_without_candidates() {
        let prompt = build_prompt("hello", &[], &EntityBundle::default(), "en", "UTC");
        assert!(prompt.contains("Temporal candidates found:\nnone"));
    }

    #[test]
    fn prompt_embeds_entities_as_json() {
        let prompt = build_prompt("hello", &[], &sample_entities(), "en", "UTC");
        assert!(prompt.contains(r#""persons":["Anna"]"#));
    }

    #[test]
    fn prompt_enumerates_schema_and_demands_json_only() {
        let prompt = build_prompt("hello", &[], &EntityBundle::default(), "en", "UTC");
        for key in [
            "title",
            "start",
            "end",
            "timezone",
            "location",
            "attendees",
            "description",
            "reminders",
            "recurrence",
            "confidence",
        ] {
            assert!(prompt.contains(key), "schema key {key} missing");
        }
        assert!(prompt.contains("Return ONLY the JSON object"));
        assert!(prompt.contains("Example:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt(
            "dentist",
            &[sample_candidate()],
            &sample_entities(),
            "en",
            "UTC",
        );
        let b = build_prompt(
            "dentist",
            &[sample_candidate()],
            &sample_entities(),
            "en",
            "UTC",
        );
        assert_eq!(a, b);
    }
}
