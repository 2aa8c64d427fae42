//! Query Spec - SQL generation from declarative query descriptions
//!
//! A [`QuerySpec`] describes a report query the way a form collects it: the table,
//! selected columns, custom bins, a filter tree, aggregates and ordering. This crate
//! validates the spec and assembles it into a single SQL statement.
//!
//! ```rust
//! use query_spec::prelude::*;
//!
//! let spec = QuerySpec::new("orders")
//!     .column("id")
//!     .filter(FilterNode::eq("status", "shipped"))
//!     .order_by("id", SortOrder::Desc);
//!
//! assert_eq!(
//!     spec.to_sql()?,
//!     "SELECT id FROM orders WHERE status = 'shipped' ORDER BY id DESC"
//! );
//! # Ok::<(), QueryGenerationError>(())
//! ```

/// Conditional debug logging macros, compiled in only with `debug-logging`
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod errors;
pub mod identifier;
pub mod prelude;
pub mod preview;
pub mod query_builder;
pub mod validation;

pub use errors::{ErrorKind, QueryGenerationError};
pub use identifier::{quote_column, quote_identifier};
pub use preview::preview;
pub use query_builder::{
    build, build_with, Aggregate, AggregateFunction, ColumnSelection, CustomBin, FilterNode,
    GeneratedQuery, Literal, OrderBy, Predicate, QuerySpec, SortOrder, SqlGenerator,
};
pub use validation::SpecValidator;
