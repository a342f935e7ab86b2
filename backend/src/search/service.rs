use std::sync::Arc;

use kg_explorer_common::{EntityResult, SearchLogEntry, Variant};

use super::Degraded;
use crate::history::SearchLogStore;
use crate::providers::{DataForSeoClient, KnowledgeGraphClient};

/// A feature was invoked without the credentials it needs.
#[derive(Debug, thiserror::Error)]
#[error("Missing configuration: {0}")]
pub struct MissingConfiguration(pub &'static str);

/// Drives the provider clients and the search log for one request at a time.
pub struct SearchService {
    store: Arc<SearchLogStore>,
    knowledge_graph: KnowledgeGraphClient,
    dataforseo: DataForSeoClient,
    result_limit: u32,
}

impl SearchService {
    pub fn new(
        store: Arc<SearchLogStore>,
        knowledge_graph: KnowledgeGraphClient,
        dataforseo: DataForSeoClient,
        result_limit: u32,
    ) -> Self {
        Self {
            store,
            knowledge_graph,
            dataforseo,
            result_limit,
        }
    }

    pub fn store(&self) -> &SearchLogStore {
        &self.store
    }

    /// Search entities for `keyword` in each variant, one call at a time.
    ///
    /// Results are concatenated in variant order. Each variant that answers
    /// successfully gets one search log entry; a failing variant contributes
    /// nothing and adds a warning.
    pub async fn run_entity_search(
        &self,
        keyword: &str,
        variants: &[Variant],
        client_ip: Option<&str>,
    ) -> Result<Degraded<Vec<EntityResult>>, MissingConfiguration> {
        let mut outcome = Degraded::new(Vec::new());

        if keyword.trim().is_empty() || variants.is_empty() {
            return Ok(outcome);
        }

        if !self.knowledge_graph.has_credentials() {
            return Err(MissingConfiguration("entity_search.api_key"));
        }

        for variant in variants {
            match self
                .knowledge_graph
                .search_entities(keyword, variant, self.result_limit)
                .await
            {
                Ok(results) => {
                    tracing::debug!(
                        "Entity search '{}' in {} returned {} results",
                        keyword,
                        variant.code,
                        results.len()
                    );
                    outcome.value.extend(results);

                    if let Err(e) = self.store.append(keyword, &variant.code, client_ip) {
                        tracing::error!("Failed to log search '{}' ({}): {}", keyword, variant.code, e);
                        outcome.warn(format!("Could not save search in {}: {}", variant.label, e));
                    }
                }
                Err(e) => {
                    tracing::warn!("Entity search '{}' in {} failed: {}", keyword, variant.code, e);
                    outcome.warn(format!("Search in {} failed: {}", variant.label, e));
                }
            }
        }

        Ok(outcome)
    }

    /// Fetch related terms for a single location/language. Not logged.
    pub async fn run_related_search(
        &self,
        keyword: &str,
        location_code: u32,
        language_code: &str,
    ) -> Result<Degraded<Vec<String>>, MissingConfiguration> {
        let mut outcome = Degraded::new(Vec::new());

        if keyword.trim().is_empty() {
            return Ok(outcome);
        }

        if !self.dataforseo.has_credentials() {
            return Err(MissingConfiguration("related_terms.username / related_terms.password"));
        }

        match self
            .dataforseo
            .related_terms(keyword, location_code, language_code)
            .await
        {
            Ok(terms) => outcome.value = terms,
            Err(e) => {
                tracing::warn!("Related terms for '{}' failed: {}", keyword, e);
                outcome.warn(format!("Could not fetch related terms: {}", e));
            }
        }

        Ok(outcome)
    }

    /// Full log for the admin view, newest first.
    pub fn admin_log(&self, limit: Option<u32>) -> Degraded<Vec<SearchLogEntry>> {
        read_or_warn(self.store.all_entries(limit))
    }

    /// Recent searches for the history view.
    pub fn recent_history(&self, limit: u32) -> Degraded<Vec<SearchLogEntry>> {
        read_or_warn(self.store.recent_entries(limit))
    }

    /// One log entry by id. A read failure yields `None` plus a warning.
    pub fn log_entry(&self, id: i64) -> Degraded<Option<SearchLogEntry>> {
        match self.store.get(id) {
            Ok(entry) => Degraded::new(entry),
            Err(e) => {
                tracing::error!("Failed to read search {}: {}", id, e);
                let mut outcome = Degraded::new(None);
                outcome.warn(format!("Could not access the search log: {}", e));
                outcome
            }
        }
    }

    /// Total number of logged searches, if the store is readable.
    pub fn total_logged(&self) -> Option<u64> {
        self.store
            .count()
            .map_err(|e| tracing::error!("Failed to count searches: {}", e))
            .ok()
    }
}

fn read_or_warn(
    result: Result<Vec<SearchLogEntry>, crate::history::StoreError>,
) -> Degraded<Vec<SearchLogEntry>> {
    match result {
        Ok(entries) => Degraded::new(entries),
        Err(e) => {
            tracing::error!("Failed to read search log: {}", e);
            let mut outcome = Degraded::new(Vec::new());
            outcome.warn(format!("Could not access the search log: {}", e));
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntitySearchConfig, RelatedTermsConfig};
    use claim::{assert_err, assert_ok};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn kg_items(names: &[&str]) -> serde_json::Value {
        let items: Vec<_> = names
            .iter()
            .map(|n| json!({"result": {"name": n, "@type": ["Thing"]}, "resultScore": 1.0}))
            .collect();
        json!({ "itemListElement": items })
    }

    fn service(server: &MockServer, api_key: Option<&str>) -> (TempDir, SearchService) {
        let dir = tempfile::tempdir().unwrap();
        let store = SearchLogStore::new(dir.path().join("log.db").to_str().unwrap()).unwrap();
        let kg = KnowledgeGraphClient::new(&EntitySearchConfig {
            base_url: server.uri(),
            api_key: api_key.map(String::from),
            ..EntitySearchConfig::default()
        })
        .unwrap();
        let seo = DataForSeoClient::new(&RelatedTermsConfig {
            base_url: server.uri(),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ..RelatedTermsConfig::default()
        })
        .unwrap();
        (dir, SearchService::new(Arc::new(store), kg, seo, 50))
    }

    #[tokio::test]
    async fn test_empty_variant_set_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kg_items(&["x"])))
            .expect(0)
            .mount(&server)
            .await;

        let (_dir, service) = service(&server, Some("key"));
        let outcome = service.run_entity_search("Madrid", &[], None).await.unwrap();
        assert!(outcome.value.is_empty());
        assert!(outcome.warnings.is_empty());
        assert_eq!(service.store().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_variant_is_skipped_and_not_logged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("languages", "es"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kg_items(&["Madrid"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("languages", "fr"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, service) = service(&server, Some("key"));
        let variants = [Variant::new("es", "Español"), Variant::new("fr", "Francés")];
        let outcome = service
            .run_entity_search("Madrid", &variants, Some("192.0.2.1"))
            .await
            .unwrap();

        assert_eq!(outcome.value.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("Francés"));

        let log = service.store().all_entries(None).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].language, "es");
        assert_eq!(log[0].ip_address.as_deref(), Some("192.0.2.1"));
    }

    #[tokio::test]
    async fn test_repeated_search_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/entities:search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kg_items(&["Roma"])))
            .expect(2)
            .mount(&server)
            .await;

        let (_dir, service) = service(&server, Some("key"));
        let variants = [Variant::new("it", "Italiano")];
        service.run_entity_search("Roma", &variants, None).await.unwrap();
        service.run_entity_search("Roma", &variants, None).await.unwrap();
        assert_eq!(service.store().count().unwrap(), 2);
    }

    fn break_log(dir: &TempDir) {
        let db = dir.path().join("log.db");
        std::fs::remove_file(&db).unwrap();
        std::fs::create_dir(&db).unwrap();
    }

    #[tokio::test]
    async fn test_failed_log_write_keeps_results_and_warns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/entities:search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kg_items(&["Madrid"])))
            .expect(2)
            .mount(&server)
            .await;

        let (dir, service) = service(&server, Some("key"));
        break_log(&dir);

        let variants = [Variant::new("es", "Español"), Variant::new("en", "Inglés")];
        let outcome = service
            .run_entity_search("Madrid", &variants, None)
            .await
            .unwrap();

        assert_eq!(outcome.value.len(), 2);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[0].contains("Could not save search in Español"));
        assert!(outcome.warnings[1].contains("Could not save search in Inglés"));
    }

    #[tokio::test]
    async fn test_keyword_is_sent_and_logged_as_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "  Madrid "))
            .respond_with(ResponseTemplate::new(200).set_body_json(kg_items(&["Madrid"])))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, service) = service(&server, Some("key"));
        let outcome = service
            .run_entity_search("  Madrid ", &[Variant::new("es", "Español")], None)
            .await
            .unwrap();
        assert_eq!(outcome.value.len(), 1);

        let log = service.store().all_entries(None).unwrap();
        assert_eq!(log[0].query, "  Madrid ");
    }

    #[tokio::test]
    async fn test_log_entry_lookup() {
        let server = MockServer::start().await;
        let (dir, service) = service(&server, None);
        let id = service.store().append("Lisboa", "en", None).unwrap();

        let found = service.log_entry(id);
        assert_eq!(found.value.map(|e| e.query).as_deref(), Some("Lisboa"));
        assert!(found.warnings.is_empty());

        let missing = service.log_entry(id + 100);
        assert!(missing.value.is_none());
        assert!(missing.warnings.is_empty());

        break_log(&dir);
        let unreadable = service.log_entry(id);
        assert!(unreadable.value.is_none());
        assert_eq!(unreadable.warnings.len(), 1);
        assert!(unreadable.warnings[0].contains("Could not access the search log"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server, None);
        let result = service
            .run_entity_search("Madrid", &[Variant::new("es", "Español")], None)
            .await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn test_blank_keyword_returns_empty() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server, None);
        let outcome = assert_ok!(
            service
                .run_entity_search("   ", &[Variant::new("es", "Español")], None)
                .await
        );
        assert!(outcome.value.is_empty());
    }

    #[tokio::test]
    async fn test_related_search_failure_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, service) = service(&server, Some("key"));
        let outcome = service.run_related_search("Madrid", 2840, "es").await.unwrap();
        assert!(outcome.value.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(service.store().count().unwrap(), 0);
    }

    #[test]
    fn test_read_failure_yields_empty_with_warning() {
        let outcome = read_or_warn(Err(crate::history::StoreError::DatabaseError(
            "disk I/O error".to_string(),
        )));
        assert!(outcome.value.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("disk I/O error"));
    }
}
