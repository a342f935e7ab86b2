pub mod mock_providers;

use std::path::Path;

use crate::config::{
    AdminConfig, Config, CorsConfig, DatabaseConfig, EntitySearchConfig, LoggingConfig,
    RelatedTermsConfig, ServerConfig,
};

pub const TEST_ADMIN_SECRET: &str = "test-secret";

/// Configuration with every credential set, pointing both providers at
/// `provider_url` and the search log at a file inside `data_dir`.
pub fn test_config(data_dir: &Path, provider_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", data_dir.join("search_logs.db").display()),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: CorsConfig {
            origins: "*".to_string(),
        },
        admin: AdminConfig {
            secret: Some(TEST_ADMIN_SECRET.to_string()),
        },
        entity_search: EntitySearchConfig {
            base_url: provider_url.to_string(),
            api_key: Some("test-kg-key".to_string()),
            timeout_secs: 5,
            ..EntitySearchConfig::default()
        },
        related_terms: RelatedTermsConfig {
            base_url: provider_url.to_string(),
            username: Some("test-user".to_string()),
            password: Some("test-pass".to_string()),
            timeout_secs: 5,
            ..RelatedTermsConfig::default()
        },
    }
}
