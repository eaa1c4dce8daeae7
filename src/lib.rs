//! Calendar-event extraction service: normalizes noisy message text,
//! gathers deterministic temporal and entity signals, asks an LLM for a
//! structured event, and reconciles the answer with a local fallback so
//! callers always get a usable record.

pub mod api;
pub mod config;
pub mod pipeline;
pub mod state;
