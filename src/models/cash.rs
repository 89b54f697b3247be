use serde::{Deserialize, Serialize};
use crate::models::cell::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Cash handed in by a driver, adds to the till.
    Driver,
    /// Cash taken out by the accountant, subtracts from the till.
    Accountant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountantType {
    Online,
    Expenditure,
}

impl AccountantType {
    pub fn note(&self) -> &'static str {
        match self {
            AccountantType::Online => "Money Sent Online",
            AccountantType::Expenditure => "Expenditure",
        }
    }
}

/// A row of the cash sheet. `amount` is always stored positive; the sign
/// comes from `entry_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashLedgerEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accountant_type: Option<AccountantType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
    #[serde(default)]
    pub date: String,
}

impl CashLedgerEntry {
    pub fn from_driver(driver: &str, amount: f64, date: String) -> Self {
        Self {
            entry_type: EntryType::Driver,
            driver: Some(driver.to_string()),
            accountant_type: None,
            note: None,
            amount,
            date,
        }
    }

    pub fn from_accountant(kind: AccountantType, amount: f64, date: String) -> Self {
        Self {
            entry_type: EntryType::Accountant,
            driver: None,
            accountant_type: Some(kind),
            note: Some(kind.note().to_string()),
            amount,
            date,
        }
    }
}
