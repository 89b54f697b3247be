use serde::{Deserialize, Serialize};
use crate::models::trip::TripRecord;
use crate::services::report::{ReportSource, ReportTotals};

fn default_period() -> usize {
    1
}

fn default_driver() -> String {
    "All".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_period")]
    pub period: usize,
    #[serde(default = "default_driver")]
    pub driver: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub period: usize,
    pub driver: String,
    pub rows: Vec<TripRecord>,
    pub totals: ReportTotals,
    pub source: ReportSource,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodOption {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub archived: bool,
    pub record: TripRecord,
    pub message: String,
}
