//! ORDER BY entries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sort by an alias or source column already present in the SELECT list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub reference: String,
    #[serde(default)]
    pub direction: SortOrder,
}

impl OrderBy {
    pub fn new(reference: impl Into<String>, direction: SortOrder) -> Self {
        Self {
            reference: reference.into(),
            direction,
        }
    }

    pub fn asc(reference: impl Into<String>) -> Self {
        Self::new(reference, SortOrder::Asc)
    }

    pub fn desc(reference: impl Into<String>) -> Self {
        Self::new(reference, SortOrder::Desc)
    }
}
