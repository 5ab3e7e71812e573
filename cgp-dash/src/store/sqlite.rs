//! Local SQLite table store
//!
//! Each table is a document table: `id` plus the row's JSON in `data`.
//! Lets the service run against a persistent local file with the same row
//! shapes the remote store uses.

use async_trait::async_trait;
use cgp_common::rows::Table;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use super::{Direction, SelectQuery, StoreError, StoreResult, TableStore};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let newly_created = !path.exists();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", path.display());
        } else {
            info!("Opened existing database: {}", path.display());
        }

        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    /// Private in-memory database
    ///
    /// Limited to one connection: every SQLite memory connection is a
    /// separate database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> StoreResult<()> {
        for table in Table::ALL {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    data TEXT NOT NULL
                )",
                table.name()
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

fn parse_row(data: &str) -> StoreResult<Value> {
    serde_json::from_str(data).map_err(|e| StoreError::Parse(e.to_string()))
}

#[async_trait]
impl TableStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> StoreResult<Vec<Value>> {
        query.validate()?;

        let mut sql = format!("SELECT data FROM {}", table.name());
        match &query.order_by {
            Some((column, direction)) => {
                let dir = match direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                sql.push_str(&format!(" ORDER BY json_extract(data, '$.{}') {}", column, dir));
            }
            None => sql.push_str(" ORDER BY rowid"),
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|(data,)| parse_row(data)).collect()
    }

    async fn insert(&self, table: Table, mut row: Value) -> StoreResult<Value> {
        let id = Uuid::new_v4().to_string();
        match row.as_object_mut() {
            Some(fields) => {
                fields.insert("id".to_string(), Value::String(id.clone()));
            }
            None => return Err(StoreError::InvalidQuery("row must be a JSON object".to_string())),
        }

        sqlx::query(&format!("INSERT INTO {} (id, data) VALUES (?, ?)", table.name()))
            .bind(&id)
            .bind(row.to_string())
            .execute(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<()> {
        sqlx::query(&format!(
            "UPDATE {} SET data = json_patch(data, ?) WHERE id = ?",
            table.name()
        ))
        .bind(patch.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_all(&self, table: Table, patch: Value) -> StoreResult<()> {
        sqlx::query(&format!("UPDATE {} SET data = json_patch(data, ?)", table.name()))
            .bind(patch.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table.name()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
