// Local key/value state: quota counters, the daily report cache and the
// last known cash total. Keys follow `<purpose>_<period-or-date>`.
pub mod memory;

use async_trait::async_trait;
use crate::error::AppError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Adds one to an integer value (absent counts as 0) and returns the new count.
    async fn increment(&self, key: &str) -> Result<i64, AppError>;
}
