//! Query builder utilities
//!
//! This module turns a [`QuerySpec`] into SQL text.

pub mod aggregation;
pub mod bins;
pub mod builder;
pub mod filter;
pub mod grouping;
pub mod literal;
pub mod ordering;
pub(crate) mod scope;
pub mod sql_generation;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod integration_tests;

pub use aggregation::{Aggregate, AggregateFunction};
pub use bins::{BinRule, CustomBin};
pub use builder::{ColumnSelection, QuerySpec};
pub use filter::{ComparisonOperator, Condition, FilterNode, Predicate};
pub use grouping::GroupBy;
pub use literal::{Literal, LiteralKind, LiteralRenderer};
pub use ordering::{OrderBy, SortOrder};
pub use sql_generation::{GeneratedQuery, SqlGenerator};

use crate::errors::QueryGenerationError;
use config::GeneratorConfig;

/// Build single-line SQL with inline literals
pub fn build(spec: &QuerySpec) -> Result<String, QueryGenerationError> {
    spec.to_sql()
}

/// Build SQL with explicit generation options
pub fn build_with(
    spec: &QuerySpec,
    options: &GeneratorConfig,
) -> Result<GeneratedQuery, QueryGenerationError> {
    SqlGenerator::generate(spec, options)
}
