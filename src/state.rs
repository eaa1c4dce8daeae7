//! Shared application state, built once at startup.

use crate::pipeline::extractor::EventExtractor;

pub struct AppState {
    pub extractor: EventExtractor,
}

impl AppState {
    pub fn new(extractor: EventExtractor) -> Self {
        Self { extractor }
    }
}
