use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::error::AppError;
use super::KeyValueStore;

/// Process-local state, used when no DATABASE_URL is configured.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, AppError> {
        let mut entries = self.entries.write().await;
        let next = entries
            .get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
            + 1;
        entries.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn increment_starts_from_absent_key() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.increment("api_quota_save_2026-10").await.unwrap(), 1);
        assert_eq!(store.increment("api_quota_save_2026-10").await.unwrap(), 2);
        assert_eq!(store.get("api_quota_save_2026-10").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("api_quota_save_2026-11").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set("cab_total_cash", "10").await.unwrap();
        store.set("cab_total_cash", "-4.5").await.unwrap();
        assert_eq!(store.get("cab_total_cash").await.unwrap().as_deref(), Some("-4.5"));
    }
}
