use std::process::exit;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use agendex::api::server::ApiServer;
use agendex::config::{default_log_filter, Config};
use agendex::pipeline::entities::HeuristicRecognizer;
use agendex::pipeline::extractor::EventExtractor;
use agendex::pipeline::openai::OpenAiClient;
use agendex::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            exit(1);
        }
    };

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set, every request will use the local fallback");
    }

    let llm = match OpenAiClient::new(
        &config.openai_base_url,
        config.openai_api_key.clone(),
        &config.openai_model,
        config.llm_timeout_secs,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build inference client");
            exit(1);
        }
    };

    let extractor = EventExtractor::new(Box::new(llm), Box::new(HeuristicRecognizer::new()));
    let state = Arc::new(AppState::new(extractor));

    let mut server =
        match ApiServer::start(config.bind_addr, state, &config.allowed_origins).await {
            Ok(server) => server,
            Err(e) => {
                tracing::error!(error = %e, "failed to start HTTP server");
                exit(1);
            }
        };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
    server.shutdown();
}
