use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;

use crate::db::settings_queries;
use crate::errors::StoreError;

/// Flat key-value persistence for planner settings. Values are JSON text.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Settings kept in the `planner_settings` table.
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(settings_queries::get_value(&self.pool, key).await?)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(settings_queries::upsert_value(&self.pool, key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Ok(settings_queries::delete_value(&self.pool, key).await?)
    }
}

/// Process-local store, used when no database is configured.
#[derive(Default)]
pub struct MemorySettingsStore {
    entries: DashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
