//! Clients for the external data providers.

pub mod dataforseo;
pub mod knowledge_graph;

pub use dataforseo::DataForSeoClient;
pub use knowledge_graph::KnowledgeGraphClient;

/// Failure talking to a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("{provider} error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Whether the error comes from missing configuration rather than the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::MissingCredentials(_))
    }
}

fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))
}
