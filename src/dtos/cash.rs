use serde::{Deserialize, Serialize};
use crate::models::cash::{AccountantType, CashLedgerEntry};
use crate::models::cell::lenient;

#[derive(Debug, Deserialize)]
pub struct DriverCashRequest {
    pub driver: String,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct AccountantCashRequest {
    pub accountant_type: AccountantType,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct PendingBatchResponse {
    pub entries: Vec<CashLedgerEntry>,
    pub pending_total: f64,
}

impl PendingBatchResponse {
    pub fn new(entries: Vec<CashLedgerEntry>) -> Self {
        let pending_total = entries.iter().map(|e| e.amount).sum();
        Self { entries, pending_total }
    }
}
