//! Process configuration from environment variables.

use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Frontend dev servers allowed by default.
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:4200", "http://localhost:3000"];

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("AGENDEX_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("invalid AGENDEX_BIND_ADDR: {e}"))?;

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());

        let llm_timeout_secs = match env::var("AGENDEX_LLM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("invalid AGENDEX_LLM_TIMEOUT_SECS: {e}"))?,
            Err(_) => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let allowed_origins = match env::var("AGENDEX_ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(Self {
            bind_addr,
            openai_api_key,
            openai_base_url,
            openai_model,
            llm_timeout_secs,
            allowed_origins,
        })
    }
}

/// Comma-separated origin list, empty entries dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default log filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,agendex=debug"
}
