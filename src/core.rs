//! Core FormQuery functionality
//!
//! This module contains the main FormQuery struct, which ties generation options,
//! query history and saved queries together.

use config::{AppConfig, GeneratorConfig};
use query_history::{HistoryRecord, HistoryStore, SavedQueries, SavedQuery};
use query_spec::{GeneratedQuery, QuerySpec};
use uuid::Uuid;

use crate::errors::FormQueryError;
use crate::executor::{PgExecutor, QueryExecutor, ResultRow};

/// Main coordinator: builds SQL from specs and remembers what was built
#[derive(Debug, Clone)]
pub struct FormQuery {
    config: AppConfig,
    history: HistoryStore,
    saved: SavedQueries,
}

impl FormQuery {
    /// Create a coordinator and load its history and saved-query files
    pub async fn new(config: AppConfig) -> Result<Self, FormQueryError> {
        let history = HistoryStore::open(&config.history).await?;
        let saved = SavedQueries::open(&config.history).await?;

        Ok(Self {
            config,
            history,
            saved,
        })
    }

    /// Load configuration the usual way and create a coordinator
    pub async fn from_env() -> Result<Self, FormQueryError> {
        Self::new(AppConfig::load()?).await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn generator_config(&self) -> &GeneratorConfig {
        &self.config.generator
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn saved(&self) -> &SavedQueries {
        &self.saved
    }

    /// Build SQL for `spec` and add it to the history.
    ///
    /// Nothing is recorded when generation fails.
    pub async fn generate(&self, spec: &QuerySpec) -> Result<GeneratedQuery, FormQueryError> {
        let generated = query_spec::build_with(spec, &self.config.generator)?;
        self.history.record(&generated.sql, Some(spec.clone())).await?;

        debug_log!(table = %spec.table, params = generated.params.len(), "query recorded");
        Ok(generated)
    }

    /// Human-readable summary of `spec`
    pub fn preview(&self, spec: &QuerySpec) -> Result<String, FormQueryError> {
        Ok(query_spec::preview(spec)?)
    }

    /// Generate, record and execute `spec`
    pub async fn run<E>(&self, spec: &QuerySpec, executor: &E) -> Result<Vec<ResultRow>, FormQueryError>
    where
        E: QueryExecutor + ?Sized,
    {
        let generated = self.generate(spec).await?;
        executor.execute(&generated).await
    }

    /// Rebuild a history entry from its stored spec, or reuse its SQL when it has none
    pub async fn restore(&self, id: Uuid) -> Result<GeneratedQuery, FormQueryError> {
        let record: HistoryRecord = self.history.get(id).await?;
        match record.spec {
            Some(spec) => Ok(query_spec::build_with(&spec, &self.config.generator)?),
            None => Ok(GeneratedQuery {
                sql: record.sql,
                params: Vec::new(),
            }),
        }
    }

    /// Save the SQL of a history entry under `name`
    pub async fn save_from_history(&self, id: Uuid, name: &str) -> Result<SavedQuery, FormQueryError> {
        let record = self.history.get(id).await?;
        Ok(self.saved.save_from_history(name, &record).await?)
    }

    /// Connect to the configured database
    pub async fn connect(&self) -> Result<PgExecutor, FormQueryError> {
        let database = self
            .config
            .database
            .as_ref()
            .ok_or(FormQueryError::DatabaseNotConfigured)?;
        PgExecutor::connect(database).await
    }
}
