use std::sync::Arc;

use crate::advisory::{Advisor, HeuristicAdvisor, LlmAdvisor};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::EntityStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn EntityStore>,
    /// Present only when an advisory API key is configured.
    pub llm: Option<LlmClient>,
    pub config: Config,
}

impl AppState {
    /// Picks the advisor for this request: model-backed when a client exists,
    /// heuristic otherwise.
    pub fn advisor(&self) -> Arc<dyn Advisor> {
        match &self.llm {
            Some(client) => Arc::new(LlmAdvisor::new(client.clone())),
            None => Arc::new(HeuristicAdvisor),
        }
    }
}
