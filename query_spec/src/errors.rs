//! Error types for query generation
//!
//! Every failure aborts the whole build; no partial SQL text is returned.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryGenerationError {
    #[error("Invalid literal '{value}': {reason}")]
    InvalidLiteral { value: String, reason: String },

    #[error("Unknown aggregate function: {0}")]
    UnknownAggregateFunction(String),

    #[error("{0} filter group has no conditions")]
    EmptyFilterGroup(String),

    #[error("Duplicate alias: {0}")]
    DuplicateAlias(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("No columns selected to display")]
    EmptySelection,

    #[error("Empty identifier in {0}")]
    EmptyIdentifier(String),

    #[error("Cannot aggregate '{0}': it is already an aggregate")]
    NestedAggregate(String),

    #[error("{0}(*) is not allowed, only COUNT accepts *")]
    WildcardNotAllowed(String),

    #[error("Custom bin '{0}' has no rules")]
    EmptyBin(String),
}

/// Fieldless discriminant of [`QueryGenerationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidLiteral,
    UnknownAggregateFunction,
    EmptyFilterGroup,
    DuplicateAlias,
    UnknownColumn,
    UnresolvedReference,
    EmptySelection,
    EmptyIdentifier,
    NestedAggregate,
    WildcardNotAllowed,
    EmptyBin,
}

impl QueryGenerationError {
    pub(crate) fn invalid_literal(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLiteral { .. } => ErrorKind::InvalidLiteral,
            Self::UnknownAggregateFunction(_) => ErrorKind::UnknownAggregateFunction,
            Self::EmptyFilterGroup(_) => ErrorKind::EmptyFilterGroup,
            Self::DuplicateAlias(_) => ErrorKind::DuplicateAlias,
            Self::UnknownColumn(_) => ErrorKind::UnknownColumn,
            Self::UnresolvedReference(_) => ErrorKind::UnresolvedReference,
            Self::EmptySelection => ErrorKind::EmptySelection,
            Self::EmptyIdentifier(_) => ErrorKind::EmptyIdentifier,
            Self::NestedAggregate(_) => ErrorKind::NestedAggregate,
            Self::WildcardNotAllowed(_) => ErrorKind::WildcardNotAllowed,
            Self::EmptyBin(_) => ErrorKind::EmptyBin,
        }
    }
}
