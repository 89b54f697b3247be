use std::sync::Arc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use crate::error::AppError;
use crate::models::cash::{AccountantType, CashLedgerEntry, EntryType};
use crate::models::cell::coerce;
use crate::sheets::SheetStore;
use crate::storage::KeyValueStore;

pub const TOTAL_CACHE_KEY: &str = "cab_total_cash";

/// Driver deposits minus accountant withdrawals.
pub fn aggregate(entries: &[CashLedgerEntry]) -> f64 {
    entries.iter().fold(0.0, |total, entry| match entry.entry_type {
        EntryType::Driver => total + entry.amount,
        EntryType::Accountant => total - entry.amount,
    })
}

/// Reads cash sheet rows, skipping any whose `type` is neither side.
pub fn entries_from_rows(rows: &[Value]) -> Vec<CashLedgerEntry> {
    rows.iter()
        .filter_map(|row| {
            let entry_type = match row.get("type").and_then(Value::as_str) {
                Some("driver") => EntryType::Driver,
                Some("accountant") => EntryType::Accountant,
                _ => return None,
            };
            let text = |column: &str| row.get(column).and_then(Value::as_str).map(str::to_string);
            Some(CashLedgerEntry {
                entry_type,
                driver: text("driver"),
                accountant_type: row
                    .get("accountant_type")
                    .and_then(|v| serde_json::from_value::<AccountantType>(v.clone()).ok()),
                note: text("note"),
                amount: row.get("amount").map(coerce).unwrap_or(0.0),
                date: text("date").unwrap_or_default(),
            })
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CashTotal {
    pub total: f64,
    /// False when the figure is the last known value rather than a fresh one.
    pub refreshed: bool,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveOutcome {
    pub saved: usize,
    pub total: CashTotal,
}

/// The cash sheet, the unsent batch of driver deposits and the last known total.
pub struct CashBook {
    store: Arc<dyn SheetStore>,
    kv: Arc<dyn KeyValueStore>,
    sheet: String,
    pending: Mutex<Vec<CashLedgerEntry>>,
}

impl CashBook {
    pub fn new(store: Arc<dyn SheetStore>, kv: Arc<dyn KeyValueStore>, sheet: &str) -> Self {
        Self {
            store,
            kv,
            sheet: sheet.to_string(),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub async fn pending(&self) -> Vec<CashLedgerEntry> {
        self.pending.lock().await.clone()
    }

    pub async fn add_driver_entry(&self, driver: &str, amount: f64, date: String) -> Result<Vec<CashLedgerEntry>, AppError> {
        if amount <= 0.0 {
            return Err(AppError::validation("Amount must be greater than 0"));
        }
        let mut pending = self.pending.lock().await;
        pending.push(CashLedgerEntry::from_driver(driver, amount, date));
        Ok(pending.clone())
    }

    pub async fn clear_pending(&self) -> usize {
        let mut pending = self.pending.lock().await;
        let dropped = pending.len();
        pending.clear();
        dropped
    }

    /// Sends the pending batch. A store that writes fewer rows than it was
    /// sent gets the unwritten tail in further requests. Entries leave the
    /// batch only once the store confirms them; on failure the rest stays
    /// for a retry.
    pub async fn submit_pending(&self) -> Result<SaveOutcome, AppError> {
        let mut pending = self.pending.lock().await;
        if pending.is_empty() {
            return Err(AppError::validation("No driver entries to submit"));
        }

        let mut saved = 0;
        while !pending.is_empty() {
            let rows = pending.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
            let written = match self.store.append(Some(self.sheet.as_str()), rows).await {
                Ok(written) => written.min(pending.len()),
                Err(e) => {
                    tracing::error!(error = %e, saved, remaining = pending.len(), "Driver cash batch failed");
                    return Err(e);
                }
            };
            if written == 0 {
                tracing::error!(saved, remaining = pending.len(), "Store wrote no cash rows");
                return Err(AppError::remote("Store accepted the batch but wrote no rows"));
            }
            pending.drain(..written);
            saved += written;
        }
        tracing::info!(entries = saved, "Saved driver cash batch");
        drop(pending);

        Ok(SaveOutcome {
            saved,
            total: self.refresh().await,
        })
    }

    pub async fn add_accountant_entry(&self, kind: AccountantType, amount: f64, date: String) -> Result<SaveOutcome, AppError> {
        if amount <= 0.0 {
            return Err(AppError::validation("Amount must be greater than 0"));
        }
        let entry = CashLedgerEntry::from_accountant(kind, amount, date);
        let saved = self.store.append(Some(self.sheet.as_str()), vec![to_row(&entry)?]).await.map_err(|e| {
            tracing::error!(error = %e, "Accountant cash entry failed");
            e
        })?;
        tracing::info!(amount, kind = kind.note(), "Saved accountant cash entry");

        Ok(SaveOutcome {
            saved,
            total: self.refresh().await,
        })
    }

    pub async fn cached_total(&self) -> f64 {
        match self.kv.get(TOTAL_CACHE_KEY).await {
            Ok(value) => value.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0),
            Err(e) => {
                tracing::warn!(error = %e, "Cash total cache unavailable");
                0.0
            }
        }
    }

    /// Re-reads the whole cash sheet. On failure the last known total is kept.
    pub async fn refresh(&self) -> CashTotal {
        match self.store.fetch(Some(self.sheet.as_str())).await {
            Ok(rows) => {
                let total = aggregate(&entries_from_rows(&rows));
                if let Err(e) = self.kv.set(TOTAL_CACHE_KEY, &total.to_string()).await {
                    tracing::warn!(error = %e, "Failed to cache cash total");
                }
                CashTotal {
                    total,
                    refreshed: true,
                    message: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cash sheet refresh failed, keeping last total");
                CashTotal {
                    total: self.cached_total().await,
                    refreshed: false,
                    message: Some(e.to_string()),
                }
            }
        }
    }
}

fn to_row(entry: &CashLedgerEntry) -> Result<Value, AppError> {
    serde_json::to_value(entry).map_err(|e| AppError::internal(format!("Failed to encode cash entry: {e}")))
}
