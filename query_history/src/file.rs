//! JSON list files

use crate::errors::HistoryError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;

/// Read a JSON array from `path`.
///
/// A missing file is an empty list. So is a file that does not parse: it is
/// logged and left in place until the next write replaces it.
pub(crate) async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, HistoryError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&content) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable store file");
            Ok(Vec::new())
        }
    }
}

/// Write `items` as pretty JSON, creating parent directories
pub(crate) async fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let content = serde_json::to_string_pretty(items)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}
