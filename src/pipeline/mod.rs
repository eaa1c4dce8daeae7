pub mod entities;
pub mod extractor;
pub mod normalize;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod reconcile;
pub mod temporal;
pub mod types;

pub use extractor::EventExtractor;
pub use types::{CalendarPlaceholder, EntityBundle, ExtractedEvent, TemporalCandidate};

use thiserror::Error;

/// Errors from the inference step of the pipeline.
///
/// Every variant is recoverable: the reconciler resolves any of them into
/// the deterministic fallback record. The variants stay distinct so logs
/// can tell a missing credential from a rate limit from a malformed answer.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no inference credential configured")]
    MissingCredential,

    #[error("inference endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("model response is not valid JSON: {0}")]
    Unparseable(String),

    #[error("model response parsed but does not match the event shape: {0}")]
    MissingFields(String),
}
