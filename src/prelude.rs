//! Convenience re-exports for common FormQuery usage
//!
//! # Example
//!
//! ```rust
//! use formquery::prelude::*;
//!
//! let spec = QuerySpec::new("orders").column("id");
//! assert_eq!(build(&spec).unwrap(), "SELECT id FROM orders");
//! ```

// Core FormQuery components
pub use crate::core::FormQuery;
pub use crate::errors::FormQueryError;
pub use crate::executor::{PgExecutor, QueryExecutor, ResultRow};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, GeneratorConfig, HistoryConfig, Layout, ParameterStyle};

// Spec building and generation
pub use query_spec::prelude::*;

// History and saved queries
pub use query_history::prelude::*;

// Common external dependencies
pub use async_trait::async_trait;
pub use serde_json::{Map, Value};
pub use tokio;
