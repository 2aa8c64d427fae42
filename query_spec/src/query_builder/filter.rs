//! Filter tree
//!
//! A filter is either a single [`Condition`] on one column or a boolean combination of
//! nested filters. Bins reuse [`Predicate`] for their WHEN tests.

use crate::query_builder::literal::Literal;
use serde::{Deserialize, Serialize};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE")]
    NotLike,
}

impl ComparisonOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::NotLike => "NOT LIKE",
        }
    }

    /// LIKE patterns only make sense against strings
    pub fn is_pattern(&self) -> bool {
        matches!(self, ComparisonOperator::Like | ComparisonOperator::NotLike)
    }
}

/// A test applied to one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    Comparison {
        operator: ComparisonOperator,
        value: Literal,
    },
    Range {
        low: Literal,
        high: Literal,
        inclusive_low: bool,
        inclusive_high: bool,
    },
    SetMembership {
        values: Vec<Literal>,
        negate: bool,
    },
    NullCheck {
        is_null: bool,
    },
}

impl Predicate {
    pub fn comparison(operator: ComparisonOperator, value: impl Into<Literal>) -> Self {
        Predicate::Comparison {
            operator,
            value: value.into(),
        }
    }

    /// Inclusive on both ends
    pub fn between(low: impl Into<Literal>, high: impl Into<Literal>) -> Self {
        Predicate::Range {
            low: low.into(),
            high: high.into(),
            inclusive_low: true,
            inclusive_high: true,
        }
    }

    /// Inclusive low, exclusive high; the usual shape for bucket boundaries
    pub fn half_open(low: impl Into<Literal>, high: impl Into<Literal>) -> Self {
        Predicate::Range {
            low: low.into(),
            high: high.into(),
            inclusive_low: true,
            inclusive_high: false,
        }
    }

    pub fn one_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        Predicate::SetMembership {
            values: values.into_iter().map(Into::into).collect(),
            negate: false,
        }
    }
}

/// Single condition in WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub predicate: Predicate,
}

/// Filter tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    Condition(Condition),
    And { children: Vec<FilterNode> },
    Or { children: Vec<FilterNode> },
    Not { child: Box<FilterNode> },
}

impl FilterNode {
    /// Create a simple condition
    pub fn condition(column: &str, predicate: Predicate) -> Self {
        Self::Condition(Condition {
            column: column.to_string(),
            predicate,
        })
    }

    /// Create AND group
    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::And { children }
    }

    /// Create OR group
    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::Or { children }
    }

    /// Negate a filter
    pub fn not(child: FilterNode) -> Self {
        Self::Not {
            child: Box::new(child),
        }
    }

    /// Comparison condition
    pub fn compare(column: &str, operator: ComparisonOperator, value: impl Into<Literal>) -> Self {
        Self::condition(column, Predicate::comparison(operator, value))
    }

    /// Equal condition
    pub fn eq(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Eq, value)
    }

    /// Not equal condition
    pub fn ne(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Ne, value)
    }

    /// Greater than condition
    pub fn gt(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Gt, value)
    }

    /// Greater than or equal condition
    pub fn gte(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Gte, value)
    }

    /// Less than condition
    pub fn lt(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Lt, value)
    }

    /// Less than or equal condition
    pub fn lte(column: &str, value: impl Into<Literal>) -> Self {
        Self::compare(column, ComparisonOperator::Lte, value)
    }

    /// LIKE condition
    pub fn like(column: &str, pattern: &str) -> Self {
        Self::compare(column, ComparisonOperator::Like, pattern)
    }

    /// Range condition with explicit bound inclusivity
    pub fn range(
        column: &str,
        low: impl Into<Literal>,
        high: impl Into<Literal>,
        inclusive_low: bool,
        inclusive_high: bool,
    ) -> Self {
        Self::condition(
            column,
            Predicate::Range {
                low: low.into(),
                high: high.into(),
                inclusive_low,
                inclusive_high,
            },
        )
    }

    /// Inclusive range condition
    pub fn between(column: &str, low: impl Into<Literal>, high: impl Into<Literal>) -> Self {
        Self::condition(column, Predicate::between(low, high))
    }

    /// Inclusive date range from `YYYY-MM-DD` text
    pub fn date_range(column: &str, start: &str, end: &str) -> Self {
        Self::between(column, Literal::date(start), Literal::date(end))
    }

    /// IN condition
    pub fn in_values(column: &str, values: Vec<Literal>) -> Self {
        Self::condition(
            column,
            Predicate::SetMembership {
                values,
                negate: false,
            },
        )
    }

    /// NOT IN condition
    pub fn not_in_values(column: &str, values: Vec<Literal>) -> Self {
        Self::condition(
            column,
            Predicate::SetMembership {
                values,
                negate: true,
            },
        )
    }

    /// IS NULL condition
    pub fn is_null(column: &str) -> Self {
        Self::condition(column, Predicate::NullCheck { is_null: true })
    }

    /// IS NOT NULL condition
    pub fn is_not_null(column: &str) -> Self {
        Self::condition(column, Predicate::NullCheck { is_null: false })
    }

    /// Whether this node is a boolean combinator rather than a leaf
    pub fn is_group(&self) -> bool {
        !matches!(self, FilterNode::Condition(_))
    }

    /// Visit every leaf condition in left-to-right order without recursion
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut found = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            match node {
                FilterNode::Condition(condition) => found.push(condition),
                FilterNode::And { children } | FilterNode::Or { children } => {
                    stack.extend(children.iter().rev());
                }
                FilterNode::Not { child } => stack.push(child),
            }
        }

        found
    }
}
