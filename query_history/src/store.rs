//! Bounded history of generated queries

use crate::errors::HistoryError;
use crate::file::{read_list, write_list};
use crate::record::HistoryRecord;
use config::HistoryConfig;
use query_spec::QuerySpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// History kept in memory and mirrored to a JSON file after every change.
///
/// Records are held oldest first; once `max_entries` is exceeded the oldest are dropped.
/// Memory only changes once the file write has succeeded.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl HistoryStore {
    /// Create an empty store without touching the file
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Open the store configured in `config` and load its file
    pub async fn open(config: &HistoryConfig) -> Result<Self, HistoryError> {
        let store = Self::new(&config.history_path, config.max_entries);
        store.load().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory records with the file contents
    pub async fn load(&self) -> Result<usize, HistoryError> {
        let mut loaded: Vec<HistoryRecord> = read_list(&self.path).await?;
        Self::evict(&mut loaded, self.max_entries);

        let count = loaded.len();
        *self.records.write().await = loaded;

        tracing::debug!(path = %self.path.display(), count, "history loaded");
        Ok(count)
    }

    /// Append a record for `sql` and persist
    pub async fn record(
        &self,
        sql: &str,
        spec: Option<QuerySpec>,
    ) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord::new(sql, spec);

        let mut records = self.records.write().await;
        let mut updated = records.clone();
        updated.push(record.clone());
        Self::evict(&mut updated, self.max_entries);

        write_list(&self.path, &updated).await?;
        *records = updated;

        Ok(record)
    }

    /// All records, newest first
    pub async fn list(&self) -> Vec<HistoryRecord> {
        self.records.read().await.iter().rev().cloned().collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<HistoryRecord, HistoryError> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(HistoryError::NotFound(id))
    }

    /// Remove one record and persist
    pub async fn delete(&self, id: Uuid) -> Result<HistoryRecord, HistoryError> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(HistoryError::NotFound(id))?;

        let mut updated = records.clone();
        let removed = updated.remove(position);

        write_list(&self.path, &updated).await?;
        *records = updated;
        Ok(removed)
    }

    /// Remove every record and persist
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let mut records = self.records.write().await;
        write_list::<HistoryRecord>(&self.path, &[]).await?;
        records.clear();
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn evict(records: &mut Vec<HistoryRecord>, max_entries: usize) {
        if records.len() > max_entries {
            let excess = records.len() - max_entries;
            records.drain(..excess);
        }
    }
}
