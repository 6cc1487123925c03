//! Postgres access for the place table. The exporter reads pages through
//! the `PlaceSource` trait so tests can substitute an in-memory source.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use thiserror::Error;

use crate::config::{DbConfig, ExportConfig};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to connect to database: {0}")]
    Connect(sqlx::Error),

    #[error("place query failed: {0}")]
    Query(sqlx::Error),
}

/// A row whose identifier could not be turned into a URL path segment.
/// Recoverable: the row is skipped, the rest of the page proceeds.
#[derive(Error, Debug, Clone)]
#[error("row {index} has an unusable identifier: {reason}")]
pub struct RowError {
    /// Position of the row within its page, as returned by the query.
    pub index: usize,
    pub reason: String,
}

/// One fetched row: the stringified place identifier, or why it could
/// not be decoded.
pub type RowResult = Result<String, RowError>;

/// Pages of place identifiers, ordered by rank descending.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Fetch one page of rows, one result per row so a single malformed
    /// identifier never aborts its page. A query-level failure is fatal.
    async fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<RowResult>, SourceError>;
}

/// Postgres-backed source. The pool lives for exactly one export run.
pub struct PgPlaceSource {
    pool: PgPool,
    query: String,
}

impl PgPlaceSource {
    /// Connect and prepare the page query. Connection failure is fatal
    /// at startup.
    pub async fn connect(db: &DbConfig, export: &ExportConfig) -> Result<Self, SourceError> {
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.name)
            .username(&db.user)
            .password(&db.password);

        // The run is fully sequential, so one connection is enough.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(SourceError::Connect)?;

        Ok(Self {
            pool,
            query: page_query(export),
        })
    }

    /// Release the pool. Called on every exit path, including failures
    /// partway through pagination.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PlaceSource for PgPlaceSource {
    async fn fetch_page(&self, limit: u64, offset: u64) -> Result<Vec<RowResult>, SourceError> {
        let rows = sqlx::query(&self.query)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(SourceError::Query)?;

        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, row)| decode_place_id(row, index))
            .collect())
    }
}

/// Identifiers cannot be bound parameters; they are restricted to a safe
/// charset at config load.
fn page_query(export: &ExportConfig) -> String {
    format!(
        "SELECT {id} FROM {table} ORDER BY {rank} DESC LIMIT $1 OFFSET $2",
        id = export.id_column,
        table = export.table,
        rank = export.rank_column,
    )
}

/// Decode the identifier column of one row into a URL path segment.
/// Accepts the integer types OGR-loaded tables use as well as text keys;
/// anything else (NULL included) yields a per-row error.
fn decode_place_id(row: &PgRow, index: usize) -> RowResult {
    if let Ok(id) = row.try_get::<i64, _>(0) {
        return Ok(id.to_string());
    }
    if let Ok(id) = row.try_get::<i32, _>(0) {
        return Ok(id.to_string());
    }
    match row.try_get::<String, _>(0) {
        Ok(id) => Ok(id),
        Err(e) => Err(RowError {
            index,
            reason: e.to_string(),
        }),
    }
}
