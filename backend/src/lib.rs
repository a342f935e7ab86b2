pub mod config;
pub mod client_ip;
pub mod error;
pub mod gate;
pub mod history;
pub mod logging;
pub mod providers;
pub mod routes;
pub mod search;
pub mod test_util;

pub use config::Config;
pub use gate::{AccessGate, RequestContext};
pub use history::{SearchLogStore, StoreError};
pub use providers::{DataForSeoClient, KnowledgeGraphClient, ProviderError};
pub use search::{Degraded, SearchService};

use std::sync::Arc;

/// Errors that prevent the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Search log unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("Provider client setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Decides per request which view runs.
    pub gate: AccessGate,
    /// Provider fan-out and search log access.
    pub search: SearchService,
}

impl AppState {
    /// Build every component from the configuration.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let store = Arc::new(SearchLogStore::new(&config.database.url)?);
        let knowledge_graph = KnowledgeGraphClient::new(&config.entity_search)?;
        let dataforseo = DataForSeoClient::new(&config.related_terms)?;

        if !knowledge_graph.has_credentials() {
            tracing::warn!("No Knowledge Graph API key configured, entity search is disabled");
        }
        if !dataforseo.has_credentials() {
            tracing::warn!("No DataForSEO credentials configured, related terms are disabled");
        }

        let search = SearchService::new(
            store,
            knowledge_graph,
            dataforseo,
            config.entity_search.result_limit,
        );

        Ok(Self {
            gate: AccessGate::new(config.admin.secret.as_deref()),
            search,
            config,
        })
    }
}
