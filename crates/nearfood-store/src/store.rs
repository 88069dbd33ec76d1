//! Table API trait and the typed [`Store`] handle.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::AuthApi;
use crate::memory::MemoryStore;
use crate::query::{Filter, Row, Select};
use crate::StoreError;

/// CRUD surface of the hosted table API.
///
/// Rows travel as JSON objects; typed access lives on [`Store`] so the
/// trait stays object-safe.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Run a filtered select.
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError>;

    /// Fetch exactly one row, failing with [`StoreError::NotFound`] when
    /// nothing matches.
    async fn select_one(&self, query: &Select) -> Result<Row, StoreError>;

    /// Insert a row, returning it as stored (ids and defaults filled in).
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Patch all rows matching `filters`, returning the updated rows.
    async fn update(&self, table: &str, filters: &[Filter], patch: Row)
        -> Result<Vec<Row>, StoreError>;

    /// Delete all rows matching `filters`, returning how many went away.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError>;

    /// Count rows matching `filters`.
    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError>;
}

/// Cloneable handle bundling the table and auth APIs with typed helpers.
#[derive(Clone)]
pub struct Store {
    tables: Arc<dyn TableStore>,
    auth: Arc<dyn AuthApi>,
}

impl Store {
    pub fn new(tables: Arc<dyn TableStore>, auth: Arc<dyn AuthApi>) -> Self {
        Self { tables, auth }
    }

    /// An in-process store for tests and keyless local development.
    pub fn in_memory() -> Self {
        let memory = Arc::new(MemoryStore::new());
        Self {
            tables: memory.clone(),
            auth: memory,
        }
    }

    pub fn auth(&self) -> &dyn AuthApi {
        self.auth.as_ref()
    }

    pub fn tables(&self) -> &dyn TableStore {
        self.tables.as_ref()
    }

    /// Select rows decoded into `T`.
    pub async fn fetch_all<T: DeserializeOwned>(&self, query: &Select) -> Result<Vec<T>, StoreError> {
        let rows = self.tables.select(query).await?;
        rows.into_iter().map(decode_row).collect()
    }

    /// Fetch a single row decoded into `T`; [`StoreError::NotFound`] when absent.
    pub async fn fetch_one<T: DeserializeOwned>(&self, query: &Select) -> Result<T, StoreError> {
        decode_row(self.tables.select_one(query).await?)
    }

    /// Like [`Store::fetch_one`] but maps the not-found code to `None`.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        query: &Select,
    ) -> Result<Option<T>, StoreError> {
        match self.tables.select_one(query).await {
            Ok(row) => Ok(Some(decode_row(row)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert a serializable value, returning it as stored.
    pub async fn insert_as<T, V>(&self, table: &str, value: &V) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        let row = encode_row(value)?;
        decode_row(self.tables.insert(table, row).await?)
    }

    /// Insert a serializable value, discarding the stored row.
    pub async fn insert_value<V: Serialize>(&self, table: &str, value: &V) -> Result<(), StoreError> {
        let row = encode_row(value)?;
        self.tables.insert(table, row).await?;
        Ok(())
    }

    /// Patch rows matching `filters` with the serialized fields of `patch`.
    pub async fn update<V: Serialize>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &V,
    ) -> Result<(), StoreError> {
        let patch = encode_row(patch)?;
        self.tables.update(table, filters, patch).await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        self.tables.delete(table, filters).await
    }

    pub async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        self.tables.count(table, filters).await
    }
}

fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(StoreError::from)
}

fn encode_row<V: Serialize>(value: &V) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidRow(format!(
            "expected JSON object, got {other}"
        ))),
    }
}
