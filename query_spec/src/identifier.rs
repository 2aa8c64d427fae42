//! Identifier quoting
//!
//! Names matching `^[A-Za-z_][A-Za-z0-9_]*$` are emitted unquoted; anything else is
//! wrapped in double quotes with embedded double quotes doubled.

use crate::errors::QueryGenerationError;

/// Check whether a name can be emitted without quoting
pub fn is_safe_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Quote a single identifier (table name, alias, bin name)
pub fn quote_identifier(name: &str) -> String {
    if is_safe_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Quote a column reference.
///
/// Dotted names like `w.tester` are treated as qualified references and each part is
/// quoted on its own. A name with an empty part is quoted as a whole.
pub fn quote_column(name: &str) -> String {
    if name.contains('.') && name.split('.').all(|part| !part.is_empty()) {
        name.split('.')
            .map(quote_identifier)
            .collect::<Vec<_>>()
            .join(".")
    } else {
        quote_identifier(name)
    }
}

/// Reject empty names; `context` names the spec element for the error message
pub(crate) fn require_name(name: &str, context: &str) -> Result<(), QueryGenerationError> {
    if name.trim().is_empty() {
        return Err(QueryGenerationError::EmptyIdentifier(context.to_string()));
    }
    Ok(())
}
