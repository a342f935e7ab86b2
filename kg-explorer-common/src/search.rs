//! Search variants and normalized provider results.

use serde::{Deserialize, Serialize};

/// A language selected for an entity search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Language code sent to the provider (e.g. "es").
    pub code: String,
    /// Human-readable label (e.g. "Español").
    pub label: String,
}

impl Variant {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// One entity returned by the knowledge-graph provider, normalized.
///
/// Built fresh per search and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityResult {
    pub name: String,
    /// Type labels in provider order.
    pub entity_types: Vec<String>,
    pub description: String,
    /// Provider relevance score, 0 when the provider omits it.
    pub score: f64,
    /// Code of the variant that produced this row.
    pub language_code: String,
    /// Label of the variant that produced this row.
    pub language_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_result_serialize() {
        let result = EntityResult {
            name: "Madrid".to_string(),
            entity_types: vec!["City".to_string(), "Place".to_string()],
            description: "Capital of Spain".to_string(),
            score: 1520.3,
            language_code: "es".to_string(),
            language_label: "Español".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""entity_types":["City","Place"]"#));
        assert!(json.contains(r#""language_label":"Español""#));
    }

    #[test]
    fn test_variant_new() {
        let variant = Variant::new("de", "Alemán");
        assert_eq!(variant.code, "de");
        assert_eq!(variant.label, "Alemán");
    }
}
