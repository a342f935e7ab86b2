//! Service configuration.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use kg_explorer_common::Variant;

/// Main configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub entity_search: EntitySearchConfig,
    #[serde(default)]
    pub related_terms: RelatedTermsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path, optionally prefixed with `sqlite:`.
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or "*".
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

/// Shared admin secret. Without it the admin view is unreachable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub secret: Option<String>,
}

/// Knowledge Graph entity search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitySearchConfig {
    #[serde(default = "default_kg_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum entities requested per language.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Languages offered for selection.
    #[serde(default = "default_languages")]
    pub languages: Vec<Variant>,
}

impl Default for EntitySearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_kg_base_url(),
            api_key: None,
            result_limit: default_result_limit(),
            timeout_secs: default_timeout_secs(),
            languages: default_languages(),
        }
    }
}

impl EntitySearchConfig {
    /// Resolve a language code against the catalog.
    ///
    /// Codes outside the catalog are kept, labelled with the code itself.
    pub fn variant_for(&self, code: &str) -> Variant {
        self.languages
            .iter()
            .find(|v| v.code == code)
            .cloned()
            .unwrap_or_else(|| Variant::new(code, code))
    }
}

/// DataForSEO SERP provider used for "people also search for".
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedTermsConfig {
    #[serde(default = "default_dataforseo_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Default location when the request does not pick one (2840 = United States).
    #[serde(default = "default_location_code")]
    pub location_code: u32,
    #[serde(default = "default_related_language")]
    pub language_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RelatedTermsConfig {
    fn default() -> Self {
        Self {
            base_url: default_dataforseo_base_url(),
            username: None,
            password: None,
            location_code: default_location_code(),
            language_code: default_related_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_database_url() -> String {
    "sqlite:./data/search_logs.db".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cors_origins() -> String {
    "*".to_string()
}
fn default_kg_base_url() -> String {
    "https://kgsearch.googleapis.com".to_string()
}
fn default_result_limit() -> u32 {
    50
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_languages() -> Vec<Variant> {
    vec![
        Variant::new("es", "Español"),
        Variant::new("en", "Inglés"),
        Variant::new("fr", "Francés"),
        Variant::new("de", "Alemán"),
        Variant::new("it", "Italiano"),
    ]
}
fn default_dataforseo_base_url() -> String {
    "https://api.dataforseo.com".to_string()
}
fn default_location_code() -> u32 {
    2840
}
fn default_related_language() -> String {
    "es".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (KGX__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("KGX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
