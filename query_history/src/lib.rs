//! Query history and saved queries
//!
//! Generated SQL is kept in a bounded history, and any query can be kept under a
//! name. Both are persisted as pretty-printed JSON files.

mod file;

pub mod errors;
pub mod prelude;
pub mod record;
pub mod saved;
pub mod store;

pub use errors::HistoryError;
pub use record::{snippet, HistoryRecord, SavedQuery};
pub use saved::SavedQueries;
pub use store::HistoryStore;

// Re-export centralized config
pub use config::HistoryConfig;
