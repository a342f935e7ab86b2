//! Canned provider payloads for tests.

use serde_json::{json, Value};

/// Knowledge Graph search response with one entity per name.
pub fn kg_response(names: &[&str]) -> Value {
    let items: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "@type": "EntitySearchResult",
                "result": {
                    "@id": format!("kg:/m/{}", i),
                    "name": name,
                    "@type": ["Thing", "Place"],
                    "description": format!("{} description", name)
                },
                "resultScore": 100.0 - i as f64
            })
        })
        .collect();

    json!({
        "@context": {"@vocab": "http://schema.org/"},
        "@type": "ItemList",
        "itemListElement": items
    })
}

/// DataForSEO SERP response with one `people_also_search` group per slice.
pub fn serp_response(groups: &[&[&str]]) -> Value {
    let items: Vec<Value> = groups
        .iter()
        .map(|titles| {
            json!({
                "type": "people_also_search",
                "items": titles
            })
        })
        .collect();

    json!({
        "status_code": 20000,
        "status_message": "Ok.",
        "tasks": [{
            "status_code": 20000,
            "result": [{
                "keyword": "keyword",
                "items": items
            }]
        }]
    })
}

pub fn serp_error(status_code: i64, message: &str) -> Value {
    json!({
        "status_code": status_code,
        "status_message": message,
        "tasks": []
    })
}
