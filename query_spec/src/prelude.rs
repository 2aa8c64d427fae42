//! Convenience re-exports for common query-spec usage

// Spec building blocks
pub use crate::query_builder::{
    Aggregate, AggregateFunction, BinRule, ColumnSelection, ComparisonOperator, CustomBin,
    FilterNode, Literal, OrderBy, Predicate, QuerySpec, SortOrder,
};

// Generation
pub use crate::query_builder::{build, build_with, GeneratedQuery, SqlGenerator};
pub use crate::preview::preview;
pub use crate::validation::SpecValidator;

// Error types
pub use crate::errors::{ErrorKind, QueryGenerationError};

// Generation options
pub use config::{GeneratorConfig, Layout, ParameterStyle};
