//! Remote table store
//!
//! The data service talks to its backing store through [`TableStore`]:
//! whole-row inserts, partial updates and deletes addressed by id, and
//! full-table selects. Rows are untyped JSON in the store's snake_case
//! column form; `cgp_common::rows` maps them to models.

pub mod rest;
pub mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use cgp_common::rows::Table;
use serde_json::Value;
use thiserror::Error;

/// Store client errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering and limit for a full-table select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order_by = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject column names that are not plain identifiers
    pub fn validate(&self) -> StoreResult<()> {
        match &self.order_by {
            Some((column, _)) if !is_column_name(column) => {
                Err(StoreError::InvalidQuery(format!("bad column name: {}", column)))
            }
            _ => Ok(()),
        }
    }
}

fn is_column_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Row-level access to the backing store
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    async fn select(&self, table: Table, query: &SelectQuery) -> StoreResult<Vec<Value>>;

    /// Insert one row; returns the stored row including its generated id
    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value>;

    /// Merge `patch` into the row with `id`
    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<()>;

    /// Merge `patch` into every row of `table`
    async fn update_all(&self, table: Table, patch: Value) -> StoreResult<()>;

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let q = SelectQuery::all().order("timestamp", Direction::Desc).limit(20);
        assert_eq!(q.order_by, Some(("timestamp".to_string(), Direction::Desc)));
        assert_eq!(q.limit, Some(20));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_column_names_are_checked() {
        let q = SelectQuery::all().order("data'); drop table leads; --", Direction::Asc);
        assert!(matches!(q.validate(), Err(StoreError::InvalidQuery(_))));
        assert!(SelectQuery::all().order("", Direction::Asc).validate().is_err());
    }
}
