//! Query orchestration: fans a keyword out over the selected variants, merges
//! provider results and writes the search log.
//!
//! Provider and storage failures never escape this module. They are logged and
//! turned into user-facing warnings on a [`Degraded`] result.

mod service;

pub use service::{MissingConfiguration, SearchService};

use serde::Serialize;

/// A result that may have been produced with some parts missing.
#[derive(Debug, Clone, Serialize)]
pub struct Degraded<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Degraded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl<T: Default> Default for Degraded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
