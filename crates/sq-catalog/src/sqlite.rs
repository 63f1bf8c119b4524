//! SQLite-backed catalog.
//!
//! Opens a read-only connection per `fetch_all` call and closes it before
//! returning, on success and on error alike. Nothing is held open between
//! resolutions.

use std::str::FromStr;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};

use sq_protocol::CatalogRecord;

use crate::error::{StoreError, StoreResult};
use crate::CatalogStore;

static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").unwrap());

/// Catalog location and schema mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite URL (e.g., "sqlite://estoque.db").
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Table holding one row per item.
    #[serde(default = "default_table")]
    pub table: String,
    /// Column with the item name.
    #[serde(default = "default_name_column")]
    pub name_column: String,
    /// Column with the units in stock.
    #[serde(default = "default_quantity_column")]
    pub quantity_column: String,
}

fn default_database_url() -> String {
    "sqlite://estoque.db".into()
}
fn default_table() -> String {
    "remedios".into()
}
fn default_name_column() -> String {
    "nome".into()
}
fn default_quantity_column() -> String {
    "quantidade".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            table: default_table(),
            name_column: default_name_column(),
            quantity_column: default_quantity_column(),
        }
    }
}

impl StoreConfig {
    /// Check that table and column names are plain SQL identifiers.
    pub fn validate(&self) -> StoreResult<()> {
        for ident in [&self.table, &self.name_column, &self.quantity_column] {
            if !RE_IDENTIFIER.is_match(ident) {
                return Err(StoreError::InvalidIdentifier(ident.clone()));
            }
        }
        Ok(())
    }
}

/// Read-only catalog over a SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    options: SqliteConnectOptions,
    select_sql: String,
}

impl SqliteCatalog {
    /// Validate the config and prepare connect options. Does not connect.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::Connect(e.to_string()))?
            .read_only(true);
        let select_sql = format!(
            "SELECT {name}, {qty} FROM {table} ORDER BY rowid",
            name = config.name_column,
            qty = config.quantity_column,
            table = config.table,
        );
        Ok(Self {
            options,
            select_sql,
        })
    }

    async fn query(&self, conn: &mut SqliteConnection) -> StoreResult<Vec<CatalogRecord>> {
        let rows = sqlx::query(&self.select_sql)
            .fetch_all(conn)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let total = rows.len();
        let records: Vec<CatalogRecord> = rows.iter().filter_map(to_record).collect();
        if records.len() < total {
            tracing::warn!(
                skipped = total - records.len(),
                "skipped catalog rows with empty name or invalid quantity"
            );
        }
        Ok(records)
    }
}

/// Rows with a blank name, a missing/negative quantity, or values of the
/// wrong storage class (SQLite does not enforce column types) are not records.
fn to_record(row: &SqliteRow) -> Option<CatalogRecord> {
    let name = row
        .try_get::<Option<String>, _>(0)
        .ok()
        .flatten()
        .filter(|n| !n.trim().is_empty())?;
    let quantity = row.try_get::<Option<i64>, _>(1).ok().flatten()?;
    let quantity = u64::try_from(quantity).ok()?;
    Some(CatalogRecord { name, quantity })
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn fetch_all(&self) -> StoreResult<Vec<CatalogRecord>> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        let result = self.query(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close catalog connection");
        }

        let records = result?;
        tracing::debug!(count = records.len(), "catalog loaded");
        Ok(records)
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}
