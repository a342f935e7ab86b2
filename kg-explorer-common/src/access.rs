//! Access modes selected per request.

use serde::{Deserialize, Serialize};

/// View a request is routed to.
///
/// Exactly one mode applies to a request; it is re-derived from the request
/// parameters every time and never stored in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Entity search over the selected languages.
    Normal,
    /// "People also search for" lookup for a single locale.
    RelatedTerms,
    /// Full search log across all users.
    Admin,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Normal => write!(f, "normal"),
            AccessMode::RelatedTerms => write!(f, "related_terms"),
            AccessMode::Admin => write!(f, "admin"),
        }
    }
}
