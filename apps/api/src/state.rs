use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Deliberately thin: the service is stateless per request, so the only shared
/// pieces are the LLM client (connection pool reuse) and the config.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Kept alongside the client so handlers can reach settings without
    /// re-reading the environment.
    #[allow(dead_code)]
    pub config: Config,
}
