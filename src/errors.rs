//! Error types for the FormQuery crate
//!
//! This module contains all error types that can be returned by FormQuery operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormQueryError {
    #[error("Query generation error: {0}")]
    Generation(#[from] query_spec::QueryGenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("History error: {0}")]
    History(#[from] query_history::HistoryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No [database] section in configuration")]
    DatabaseNotConfigured,
}
