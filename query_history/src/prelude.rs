//! Convenience re-exports for common query-history usage

pub use crate::errors::HistoryError;
pub use crate::record::{HistoryRecord, SavedQuery};
pub use crate::saved::SavedQueries;
pub use crate::store::HistoryStore;

pub use config::HistoryConfig;
pub use uuid::Uuid;
