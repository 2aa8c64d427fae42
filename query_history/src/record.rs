//! Stored entries

use chrono::{DateTime, Utc};
use query_spec::QuerySpec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest snippet kept before truncation
pub const SNIPPET_LENGTH: usize = 120;

/// One generated query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub sql: String,
    /// Single-line excerpt for list views
    pub snippet: String,
    /// The spec the SQL was built from, when known
    #[serde(default)]
    pub spec: Option<QuerySpec>,
}

impl HistoryRecord {
    pub fn new(sql: impl Into<String>, spec: Option<QuerySpec>) -> Self {
        let sql = sql.into();
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            snippet: snippet(&sql),
            sql,
            spec,
        }
    }
}

/// A query kept under a user-chosen name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub sql: String,
    #[serde(default)]
    pub spec: Option<QuerySpec>,
    pub saved_at: DateTime<Utc>,
}

impl SavedQuery {
    pub fn new(name: impl Into<String>, sql: impl Into<String>, spec: Option<QuerySpec>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            spec,
            saved_at: Utc::now(),
        }
    }
}

/// Collapse whitespace runs to single spaces and cut to [`SNIPPET_LENGTH`] characters
pub fn snippet(sql: &str) -> String {
    let collapsed = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_LENGTH {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(SNIPPET_LENGTH).collect();
    format!("{}...", cut)
}
