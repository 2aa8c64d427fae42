//! # FormQuery
//!
//! Form-driven SQL generation for PostgreSQL reporting. A [`QuerySpec`] collected from a
//! form is validated and assembled into a single SELECT statement; every generated query
//! is kept in a bounded history, can be saved under a name, and can be executed through
//! any [`QueryExecutor`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formquery::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let formquery = FormQuery::new(AppConfig::default()).await?;
//!
//!     let spec = QuerySpec::new("orders")
//!         .column("region")
//!         .aggregate(Aggregate::count_all("total"))
//!         .filter(FilterNode::eq("status", "shipped"))
//!         .order_by("total", SortOrder::Desc);
//!
//!     let generated = formquery.generate(&spec).await?;
//!     println!("{}", generated.sql);
//!     println!("{}", formquery.preview(&spec)?);
//!
//!     let executor = formquery.connect().await?;
//!     for row in formquery.run(&spec, &executor).await? {
//!         println!("{:?}", row);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod executor;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::FormQuery;
pub use errors::FormQueryError;
pub use executor::{PgExecutor, QueryExecutor, ResultRow};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, GeneratorConfig, HistoryConfig, Layout, ParameterStyle};

// Re-export member crates
pub use query_history;
pub use query_spec;

pub use query_spec::{GeneratedQuery, QuerySpec};

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
