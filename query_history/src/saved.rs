//! Named saved queries

use crate::errors::HistoryError;
use crate::file::{read_list, write_list};
use crate::record::{HistoryRecord, SavedQuery};
use config::HistoryConfig;
use query_spec::QuerySpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Saved queries, unique by name, mirrored to a JSON file after every change
#[derive(Debug, Clone)]
pub struct SavedQueries {
    path: PathBuf,
    queries: Arc<RwLock<Vec<SavedQuery>>>,
}

impl SavedQueries {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Open the saved-query file configured in `config`
    pub async fn open(config: &HistoryConfig) -> Result<Self, HistoryError> {
        let saved = Self::new(&config.saved_path);
        saved.reload().await?;
        Ok(saved)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory queries with the file contents
    pub async fn reload(&self) -> Result<usize, HistoryError> {
        let loaded: Vec<SavedQuery> = read_list(&self.path).await?;
        let count = loaded.len();
        *self.queries.write().await = loaded;

        tracing::debug!(path = %self.path.display(), count, "saved queries loaded");
        Ok(count)
    }

    /// Save `sql` under a new name
    pub async fn save(
        &self,
        name: &str,
        sql: &str,
        spec: Option<QuerySpec>,
    ) -> Result<SavedQuery, HistoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HistoryError::InvalidName(name.to_string()));
        }

        let mut queries = self.queries.write().await;
        if queries.iter().any(|query| query.name == name) {
            return Err(HistoryError::DuplicateName(name.to_string()));
        }

        let query = SavedQuery::new(name, sql, spec);
        let mut updated = queries.clone();
        updated.push(query.clone());

        write_list(&self.path, &updated).await?;
        *queries = updated;

        Ok(query)
    }

    /// Save a history entry under a new name
    pub async fn save_from_history(
        &self,
        name: &str,
        record: &HistoryRecord,
    ) -> Result<SavedQuery, HistoryError> {
        self.save(name, &record.sql, record.spec.clone()).await
    }

    /// Look up a saved query by name
    pub async fn load(&self, name: &str) -> Result<SavedQuery, HistoryError> {
        self.queries
            .read()
            .await
            .iter()
            .find(|query| query.name == name)
            .cloned()
            .ok_or_else(|| HistoryError::SavedNotFound(name.to_string()))
    }

    pub async fn delete(&self, name: &str) -> Result<SavedQuery, HistoryError> {
        let mut queries = self.queries.write().await;
        let position = queries
            .iter()
            .position(|query| query.name == name)
            .ok_or_else(|| HistoryError::SavedNotFound(name.to_string()))?;

        let mut updated = queries.clone();
        let removed = updated.remove(position);

        write_list(&self.path, &updated).await?;
        *queries = updated;
        Ok(removed)
    }

    /// All saved queries in the order they were saved
    pub async fn list(&self) -> Vec<SavedQuery> {
        self.queries.read().await.clone()
    }
}
