//! Parses the model's answer into a `ModelEvent`.
//!
//! Distinguishes "not JSON at all" from "JSON but not the expected object
//! shape": both still route to the same fallback, but the logs can tell
//! them apart. Tolerates markdown fences and surrounding prose.

use super::types::ModelEvent;
use super::ExtractError;

/// Parse the raw model response into a `ModelEvent`.
pub fn parse_model_response(raw: &str) -> Result<ModelEvent, ExtractError> {
    let json_str = extract_json_block(raw);

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractError::Unparseable(e.to_string()))?;

    if !value.is_object() {
        return Err(ExtractError::MissingFields(
            "top-level JSON is not an object".into(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ExtractError::MissingFields(e.to_string()))
}

/// Extract the JSON body from a potentially fenced or prose-wrapped answer.
fn extract_json_block(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ANSWER: &str = r#"{
        "title": "Dentist appointment",
        "start": "2025-11-12T15:00:00+01:00",
        "end": "2025-11-12T15:30:00+01:00",
        "timezone": "Europe/Budapest",
        "location": null,
        "attendees": ["Anna"],
        "description": "From message",
        "reminders": [30],
        "recurrence": null,
        "confidence": 0.9
    }"#;

    #[test]
    fn parses_plain_json_object() {
        let event = parse_model_response(FULL_ANSWER).unwrap();
        assert_eq!(event.title.as_deref(), Some("Dentist appointment"));
        assert_eq!(event.attendees, vec!["Anna"]);
        assert_eq!(event.reminders, vec![30]);
        assert_eq!(event.confidence, Some(0.9));
        assert!(event.start.is_some());
    }

    #[test]
    fn parses_fenced_json() {
        let raw = format!("Here you go:\n```json\n{FULL_ANSWER}\n```\nDone.");
        let event = parse_model_response(&raw).unwrap();
        assert_eq!(event.title.as_deref(), Some("Dentist appointment"));
    }

    #[test]
    fn parses_prose_wrapped_json() {
        let raw = format!("Sure! {FULL_ANSWER} hope that helps");
        let event = parse_model_response(&raw).unwrap();
        assert_eq!(event.title.as_deref(), Some("Dentist appointment"));
    }

    #[test]
    fn non_json_is_unparseable() {
        let result = parse_model_response("I could not find an event in this text.");
        assert!(matches!(result, Err(ExtractError::Unparseable(_))));
    }

    #[test]
    fn non_object_json_is_missing_fields() {
        let result = parse_model_response("[1, 2, 3]");
        assert!(matches!(result, Err(ExtractError::MissingFields(_))));
    }

    #[test]
    fn wrong_field_type_is_missing_fields() {
        // start must be an RFC 3339 timestamp with offset
        let result = parse_model_response(r#"{"start": "next wednesday"}"#);
        assert!(matches!(result, Err(ExtractError::MissingFields(_))));
    }

    #[test]
    fn empty_object_parses_with_all_defaults() {
        let event = parse_model_response("{}").unwrap();
        assert!(event.title.is_none());
        assert!(event.confidence.is_none());
        assert!(event.attendees.is_empty());
    }
}
