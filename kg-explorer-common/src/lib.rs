//! KG Explorer Common Types
//!
//! Shared types used by the backend service and its HTTP clients.

pub mod access;
pub mod history;
pub mod search;

pub use access::AccessMode;
pub use history::SearchLogEntry;
pub use search::{EntityResult, Variant};
