use std::sync::Arc;
use chrono::NaiveDate;
use serde::Serialize;
use crate::clock::{month_key, sheet_date, Clock};
use crate::error::AppError;
use crate::models::trip::TripRecord;
use crate::storage::KeyValueStore;

pub const DEFAULT_SAVE_QUOTA: i64 = 100;
pub const DEFAULT_REPORT_QUOTA: i64 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaKind {
    Save,
    Report,
}

impl QuotaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaKind::Save => "save",
            QuotaKind::Report => "report",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuotaLimits {
    pub save: i64,
    pub report: i64,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            save: DEFAULT_SAVE_QUOTA,
            report: DEFAULT_REPORT_QUOTA,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuotaUsage {
    pub kind: QuotaKind,
    pub period: String,
    pub used: i64,
    pub cap: i64,
    pub can_proceed: bool,
}

/// Monthly call caps for the remote store plus the daily report cache.
///
/// Counters only move forward after a confirmed remote success and are
/// never decremented. A new month is a new key, so rollover needs no reset.
#[derive(Clone)]
pub struct QuotaGuard {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    limits: QuotaLimits,
}

impl QuotaGuard {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, limits: QuotaLimits) -> Self {
        Self { kv, clock, limits }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn cap(&self, kind: QuotaKind) -> i64 {
        match kind {
            QuotaKind::Save => self.limits.save,
            QuotaKind::Report => self.limits.report,
        }
    }

    fn counter_key(&self, kind: QuotaKind) -> String {
        format!("api_quota_{}_{}", kind.as_str(), month_key(self.today()))
    }

    fn cache_key(day: NaiveDate) -> String {
        format!("report_cache_{}", sheet_date(day))
    }

    pub async fn used(&self, kind: QuotaKind) -> Result<i64, AppError> {
        let raw = self.kv.get(&self.counter_key(kind)).await?;
        Ok(raw.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0))
    }

    pub async fn can_proceed(&self, kind: QuotaKind) -> Result<bool, AppError> {
        Ok(self.used(kind).await? < self.cap(kind))
    }

    /// Call only after the remote operation is known to have succeeded.
    pub async fn record_success(&self, kind: QuotaKind) -> Result<i64, AppError> {
        let count = self.kv.increment(&self.counter_key(kind)).await?;
        tracing::debug!(kind = kind.as_str(), count, "Recorded store call");
        Ok(count)
    }

    pub async fn usage(&self, kind: QuotaKind) -> Result<QuotaUsage, AppError> {
        let used = self.used(kind).await?;
        let cap = self.cap(kind);
        Ok(QuotaUsage {
            kind,
            period: month_key(self.today()),
            used,
            cap,
            can_proceed: used < cap,
        })
    }

    /// A cache entry that cannot be read back counts as absent.
    pub async fn get_cache(&self, day: NaiveDate) -> Option<Vec<TripRecord>> {
        let key = Self::cache_key(day);
        let raw = match self.kv.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Report cache unavailable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!(%key, error = %e, "Discarding unreadable report cache");
                None
            }
        }
    }

    pub async fn set_cache(&self, day: NaiveDate, rows: &[TripRecord]) -> Result<(), AppError> {
        let raw = serde_json::to_string(rows)
            .map_err(|e| AppError::internal(format!("Failed to encode report cache: {e}")))?;
        self.kv.set(&Self::cache_key(day), &raw).await
    }
}
