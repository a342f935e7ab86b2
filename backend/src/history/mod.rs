//! Durable search log.

mod sqlite;

pub use sqlite::{SearchLogStore, StoreError};
