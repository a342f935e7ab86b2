//! Search log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One issued provider query, as recorded in the search log.
///
/// A keyword searched in K languages produces K entries, one per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    /// The keyword as submitted.
    pub query: String,
    /// Language code used for this particular call.
    pub language: String,
    /// Insert time, assigned by the store.
    pub timestamp: DateTime<Utc>,
    /// Best-effort caller address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}
