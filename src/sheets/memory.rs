use std::collections::HashMap;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use crate::error::AppError;
use super::SheetStore;

/// In-memory stand-in for the remote store.
#[derive(Default)]
pub struct MemorySheetStore {
    sheets: RwLock<HashMap<String, Vec<Value>>>,
    fail: RwLock<bool>,
    row_limit: RwLock<Option<usize>>,
    fetches: RwLock<usize>,
    appends: RwLock<usize>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, sheet: Option<&str>, rows: Vec<Value>) {
        self.sheets.write().await.insert(sheet.unwrap_or_default().to_string(), rows);
    }

    pub async fn rows(&self, sheet: Option<&str>) -> Vec<Value> {
        self.sheets.read().await.get(sheet.unwrap_or_default()).cloned().unwrap_or_default()
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Writes at most `limit` rows per append, like the script-backed store.
    pub async fn set_row_limit(&self, limit: Option<usize>) {
        *self.row_limit.write().await = limit;
    }

    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }

    pub async fn append_count(&self) -> usize {
        *self.appends.read().await
    }

    async fn check(&self) -> Result<(), AppError> {
        if *self.fail.read().await {
            return Err(AppError::remote("Failed to reach store: connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn fetch(&self, sheet: Option<&str>) -> Result<Vec<Value>, AppError> {
        self.check().await?;
        *self.fetches.write().await += 1;
        Ok(self.rows(sheet).await)
    }

    async fn append(&self, sheet: Option<&str>, rows: Vec<Value>) -> Result<usize, AppError> {
        self.check().await?;
        *self.appends.write().await += 1;
        let count = match *self.row_limit.read().await {
            Some(limit) => rows.len().min(limit),
            None => rows.len(),
        };
        self.sheets
            .write()
            .await
            .entry(sheet.unwrap_or_default().to_string())
            .or_default()
            .extend(rows.into_iter().take(count));
        Ok(count)
    }

    async fn search(&self, sheet: Option<&str>, criteria: &[(&str, &str)]) -> Result<Vec<Value>, AppError> {
        self.check().await?;
        let matches = self
            .rows(sheet)
            .await
            .into_iter()
            .filter(|row| {
                criteria
                    .iter()
                    .all(|(column, wanted)| row.get(*column).and_then(Value::as_str) == Some(*wanted))
            })
            .collect();
        Ok(matches)
    }
}
