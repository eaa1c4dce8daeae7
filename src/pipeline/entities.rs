//! Heuristic named-entity recognition over normalized text.
//!
//! Recognized spans are bucketed into persons, locations (geopolitical,
//! generic-location and facility labels merge into one list) and
//! organizations, deduplicated by exact text in first-seen order.
//!
//! The recognizer is best-effort pattern matching, not morphological
//! analysis: person cues (greetings, honorifics, "with <Name>"),
//! street/facility suffixes, corporate suffixes, and a conservative
//! "in <Place>" rule gated by a stop list.

use std::sync::LazyLock;

use regex::Regex;

use super::types::EntityBundle;

/// Entity category assigned by a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    /// Geopolitical entity (city, country).
    Gpe,
    /// Generic location.
    Loc,
    /// Facility (building, venue).
    Fac,
    Org,
}

/// A recognized span: the matched text, its label, and its byte offset in
/// the source text (used to preserve first-seen order across patterns).
#[derive(Debug, Clone)]
pub struct RecognizedSpan {
    pub text: String,
    pub label: EntityLabel,
    pub offset: usize,
}

/// Named-entity recognition capability. One instance is constructed at
/// process start and shared read-only across requests.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<RecognizedSpan>;
}

static GREETING_PERSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Hi|Hello|Hey|Dear)[ ,]+([A-Z][a-zA-Z]+)").unwrap());

static HONORIFIC_PERSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Dr|Mr|Mrs|Ms|Prof)\.?\s+([A-Z][a-zA-Z]+)").unwrap());

static LINKED_PERSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:with|and)\s+([A-Z][a-z]+)\b").unwrap());

static STREET_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:[A-Z][A-Za-z']*\s+)+(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Boulevard|Square|Plaza|Park)\.?(?:\s+\d+)?)",
    )
    .unwrap()
});

static FACILITY_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:at|in)\s+(?:the\s+)?((?:[A-Z][A-Za-z'&]*\s+)*[A-Z][A-Za-z'&]*\s+(?:Office|Clinic|Center|Centre|Hospital|Cafe|Restaurant|Hotel|Hall|Library|School|University))\b",
    )
    .unwrap()
});

static IN_PLACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+([A-Z][a-z]+)\b").unwrap());

static ORG_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z&]*(?:\s+[A-Z][A-Za-z&]*)*\s+(?:Inc|Ltd|LLC|GmbH|Corp|Co)\b\.?)")
        .unwrap()
});

/// Capitalized words that look like names to the patterns but never are.
const STOP_WORDS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
    "today",
    "tonight",
    "tomorrow",
    "jan",
    "feb",
    "mar",
    "apr",
    "jun",
    "jul",
    "aug",
    "sep",
    "oct",
    "nov",
    "dec",
    "mon",
    "tue",
    "wed",
    "thu",
    "fri",
    "sat",
    "sun",
    "dr",
    "mr",
    "mrs",
    "ms",
    "prof",
];

fn is_stop_word(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Regex pattern-table recognizer. Stateless once built; safe to share.
#[derive(Debug, Default)]
pub struct HeuristicRecognizer;

impl HeuristicRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Vec<RecognizedSpan> {
        let mut spans = Vec::new();

        let mut collect = |re: &Regex, label: EntityLabel, gated: bool| {
            for caps in re.captures_iter(text) {
                let m = caps.get(1).unwrap();
                if gated && is_stop_word(m.as_str()) {
                    continue;
                }
                spans.push(RecognizedSpan {
                    text: m.as_str().to_string(),
                    label,
                    offset: m.start(),
                });
            }
        };

        collect(&GREETING_PERSON, EntityLabel::Person, true);
        collect(&HONORIFIC_PERSON, EntityLabel::Person, true);
        collect(&LINKED_PERSON, EntityLabel::Person, true);
        collect(&STREET_LOCATION, EntityLabel::Loc, false);
        collect(&FACILITY_LOCATION, EntityLabel::Fac, false);
        collect(&IN_PLACE, EntityLabel::Gpe, true);
        collect(&ORG_SUFFIX, EntityLabel::Org, false);

        spans.sort_by_key(|s| s.offset);
        spans
    }
}

/// Bucket recognized spans into the three entity lists, merging GPE / LOC /
/// FAC into `locations`, deduplicating by exact text, first-seen order.
pub fn bucket_entities(spans: &[RecognizedSpan]) -> EntityBundle {
    let mut bundle = EntityBundle::default();
    for span in spans {
        let list = match span.label {
            EntityLabel::Person => &mut bundle.persons,
            EntityLabel::Gpe | EntityLabel::Loc | EntityLabel::Fac => &mut bundle.locations,
            EntityLabel::Org => &mut bundle.orgs,
        };
        if !list.contains(&span.text) {
            list.push(span.text.clone());
        }
    }
    bundle
}
