//! Running generated queries
//!
//! [`QueryExecutor`] is the seam between generation and a database. [`PgExecutor`]
//! runs queries on PostgreSQL and returns each row as a JSON object.

use async_trait::async_trait;
use config::DatabaseConfig;
use query_spec::GeneratedQuery;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;

use crate::errors::FormQueryError;

/// One result row, keyed by output column name
pub type ResultRow = Map<String, Value>;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &GeneratedQuery) -> Result<Vec<ResultRow>, FormQueryError>;
}

/// Executes queries against a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    /// Connect a new pool
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FormQueryError> {
        let connection_string = config.connection_string();

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), FormQueryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

/// Wrap a query so every row comes back as one JSON object.
///
/// Rows are numbered as the inner query yields them and the outer query sorts
/// on that number, so the inner ORDER BY survives the wrap.
pub fn json_rows_sql(sql: &str) -> String {
    let inner = sql.trim().trim_end_matches(';').trim_end();
    format!(
        "SELECT numbered.data FROM (SELECT row_to_json(q) AS data, row_number() OVER () AS ordinal \
         FROM ({}) q) numbered ORDER BY numbered.ordinal",
        inner
    )
}

/// Turn one JSON value per row into result rows, wrapping non-objects under `value`
pub fn rows_from_json(values: Vec<Value>) -> Vec<ResultRow> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        })
        .collect()
}

fn bind_param(
    query: sqlx::query::Query<'_, Postgres, PgArguments>,
    param: Value,
) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    match param {
        Value::String(s) => query.bind(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::Bool(b) => query.bind(b),
        Value::Null => query.bind(Option::<String>::None),
        other => query.bind(other.to_string()),
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn execute(&self, query: &GeneratedQuery) -> Result<Vec<ResultRow>, FormQueryError> {
        let sql = json_rows_sql(&query.sql);

        let mut sqlx_query = sqlx::query(&sql);
        for param in query.params.iter().cloned() {
            sqlx_query = bind_param(sqlx_query, param);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        tracing::debug!(rows = rows.len(), "query executed");

        let values = rows
            .iter()
            .map(|row| row.try_get::<Value, _>("data"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows_from_json(values))
    }
}
