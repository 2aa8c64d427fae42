use crate::errors::QueryGenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source column accepted by `COUNT(*)`
pub const WILDCARD: &str = "*";

/// Represents SQL aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregateFunction {
    /// COUNT(*) or COUNT(field)
    Count,
    /// SUM(field)
    Sum,
    /// AVG(field)
    Avg,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
    /// COUNT(DISTINCT field)
    CountDistinct,
}

impl AggregateFunction {
    /// Convert aggregate function to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::CountDistinct => "COUNT",
        }
    }

    /// Check if this is a DISTINCT aggregate
    pub fn is_distinct(&self) -> bool {
        matches!(self, AggregateFunction::CountDistinct)
    }

    /// Display name, also the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::CountDistinct => "COUNT DISTINCT",
            other => other.to_sql(),
        }
    }

    fn alias_prefix(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::CountDistinct => "count_distinct",
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = QueryGenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "COUNT" => Ok(AggregateFunction::Count),
            "SUM" => Ok(AggregateFunction::Sum),
            "AVG" => Ok(AggregateFunction::Avg),
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            "COUNT DISTINCT" => Ok(AggregateFunction::CountDistinct),
            _ => Err(QueryGenerationError::UnknownAggregateFunction(s.to_string())),
        }
    }
}

impl TryFrom<String> for AggregateFunction {
    type Error = QueryGenerationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AggregateFunction> for String {
    fn from(function: AggregateFunction) -> Self {
        function.name().to_string()
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregate SELECT item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub function: AggregateFunction,
    /// Source column, a bin or column alias, or `*` for COUNT
    pub column: String,
    /// Result alias; derived from function and column when absent
    #[serde(default)]
    pub alias: Option<String>,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, column: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            function,
            column: column.into(),
            alias: (!alias.is_empty()).then_some(alias),
        }
    }

    /// Build from the function name chosen in the form
    pub fn parse(
        function: &str,
        column: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<Self, QueryGenerationError> {
        Ok(Self::new(function.parse()?, column, alias))
    }

    /// Create COUNT(*) aggregate
    pub fn count_all(alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Count, WILDCARD, alias)
    }

    /// Create COUNT(column) aggregate
    pub fn count(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Count, column, alias)
    }

    /// Create COUNT(DISTINCT column) aggregate
    pub fn count_distinct(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::CountDistinct, column, alias)
    }

    /// Create SUM(column) aggregate
    pub fn sum(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Sum, column, alias)
    }

    /// Create AVG(column) aggregate
    pub fn avg(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Avg, column, alias)
    }

    /// Create MIN(column) aggregate
    pub fn min(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Min, column, alias)
    }

    /// Create MAX(column) aggregate
    pub fn max(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Max, column, alias)
    }

    pub fn is_wildcard(&self) -> bool {
        self.column.trim() == WILDCARD
    }

    /// The alias this aggregate is emitted under
    pub fn output_name(&self) -> String {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => {
                let column = if self.is_wildcard() {
                    "all".to_string()
                } else {
                    slug(&self.column)
                };
                format!("{}_{}", self.function.alias_prefix(), column)
            }
        }
    }
}

/// Collapse every run of non-alphanumeric characters into `_`
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    out
}
