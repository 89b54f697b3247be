use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use crate::clock::{parse_sheet_date, sheet_date, yesterday};
use crate::error::AppError;
use crate::models::trip::TripRecord;
use crate::services::quota::{QuotaGuard, QuotaKind};
use crate::sheets::SheetStore;

pub const ALL_DRIVERS: &str = "All";

/// Period presets offered to the report screen, as (label, row count).
pub const PERIODS: [(&str, usize); 4] = [
    ("Last Day", 1),
    ("Last 7 Days", 7),
    ("1 Month", 30),
    ("3 Months", 90),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportTotals {
    pub total_earnings: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Fetched from the store just now.
    Live,
    /// Today's cached copy; no network call made.
    Cache,
    /// Yesterday's cached copy, or nothing, after a failed or refused fetch.
    Fallback,
}

#[derive(Debug)]
pub struct ReportLoad {
    pub records: Vec<TripRecord>,
    pub source: ReportSource,
    pub message: Option<String>,
}

/// Newest first. Rows whose date does not parse sort last.
pub fn sort_newest_first(records: &mut [TripRecord]) {
    records.sort_by_cached_key(|r| std::cmp::Reverse(parse_sheet_date(&r.date)));
}

/// The first `period` rows, then narrowed to one driver unless `driver` is "All".
/// Rows must already be newest first; this is a row count, not a date range.
pub fn filter(records: &[TripRecord], period: usize, driver: &str) -> Vec<TripRecord> {
    records
        .iter()
        .take(period)
        .filter(|r| driver == ALL_DRIVERS || r.driver == driver)
        .cloned()
        .collect()
}

pub fn totals(records: &[TripRecord]) -> ReportTotals {
    records.iter().fold(
        ReportTotals {
            total_earnings: 0.0,
            total_expenses: 0.0,
            total_profit: 0.0,
        },
        |acc, r| ReportTotals {
            total_earnings: acc.total_earnings + r.earnings,
            total_expenses: acc.total_expenses
                + r.fuel
                + r.yatri_commission
                + r.uber_commission
                + r.other_expenses,
            total_profit: acc.total_profit + r.owner_profit,
        },
    )
}

pub fn records_from_rows(rows: Vec<Value>) -> Vec<TripRecord> {
    let total = rows.len();
    let records: Vec<TripRecord> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if records.len() < total {
        tracing::warn!(skipped = total - records.len(), "Skipped unreadable trip rows");
    }
    records
}

/// Today's rows if there are any, otherwise everything.
pub fn latest_day(records: Vec<TripRecord>, today: NaiveDate) -> Vec<TripRecord> {
    let today = sheet_date(today);
    let todays: Vec<TripRecord> = records.iter().filter(|r| r.date == today).cloned().collect();
    if todays.is_empty() { records } else { todays }
}

/// Reads the trip sheet through the quota guard. Never fails: a refused or
/// failed fetch degrades to yesterday's cache, then to no rows.
pub async fn load_records(guard: &QuotaGuard, store: &dyn SheetStore) -> ReportLoad {
    let today = guard.today();

    if let Some(cached) = guard.get_cache(today).await {
        if !cached.is_empty() {
            return ReportLoad {
                records: cached,
                source: ReportSource::Cache,
                message: None,
            };
        }
    }

    match guard.can_proceed(QuotaKind::Report).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(cap = guard.cap(QuotaKind::Report), "Monthly report quota reached");
            let message = format!(
                "Monthly report quota reached ({} calls). Showing the last saved copy.",
                guard.cap(QuotaKind::Report)
            );
            return fallback(guard, today, message).await;
        }
        Err(e) => return fallback(guard, today, e.to_string()).await,
    }

    match fetch_sorted(store).await {
        Ok(records) => {
            if let Err(e) = guard.set_cache(today, &records).await {
                tracing::warn!(error = %e, "Failed to cache report rows");
            }
            if let Err(e) = guard.record_success(QuotaKind::Report).await {
                tracing::error!(error = %e, "Failed to record report quota");
            }
            tracing::info!(rows = records.len(), "Loaded trip records from store");
            ReportLoad {
                records,
                source: ReportSource::Live,
                message: None,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Trip sheet fetch failed");
            fallback(guard, today, e.to_string()).await
        }
    }
}

/// Folds a row just appended to the trip sheet into today's cache, in the
/// position a fresh fetch would give it. Without a cache there is nothing to
/// update; the next load reads the sheet.
pub async fn remember_saved(guard: &QuotaGuard, record: &TripRecord) {
    let today = guard.today();
    let Some(mut cached) = guard.get_cache(today).await else {
        return;
    };
    cached.push(record.clone());
    sort_newest_first(&mut cached);
    if let Err(e) = guard.set_cache(today, &cached).await {
        tracing::warn!(error = %e, "Failed to add saved trip to report cache");
    }
}

async fn fetch_sorted(store: &dyn SheetStore) -> Result<Vec<TripRecord>, AppError> {
    let rows = store.fetch(None).await?;
    let mut records = records_from_rows(rows);
    sort_newest_first(&mut records);
    Ok(records)
}

async fn fallback(guard: &QuotaGuard, today: NaiveDate, message: String) -> ReportLoad {
    let records = guard
        .get_cache(yesterday(today))
        .await
        .filter(|rows| !rows.is_empty())
        .unwrap_or_default();
    tracing::warn!(rows = records.len(), "Serving report from yesterday's cache");
    ReportLoad {
        records,
        source: ReportSource::Fallback,
        message: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use proptest::prelude::*;
    use serde_json::json;
    use super::*;
    use crate::clock::fixed::FixedClock;
    use crate::services::quota::QuotaLimits;
    use crate::sheets::memory::MemorySheetStore;
    use crate::storage::memory::MemoryKeyValueStore;

    fn record(date: &str, driver: &str, earnings: f64, fuel: f64, profit: f64) -> TripRecord {
        serde_json::from_value(json!({
            "date": date,
            "driver": driver,
            "earnings": earnings,
            "fuel": fuel,
            "uber_commission": "117",
            "yatri_commission": "10",
            "owner_profit": profit,
        }))
        .unwrap()
    }

    fn dates(records: &[TripRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn sorts_by_parsed_date_with_bad_dates_last() {
        let mut records = vec![
            record("05/09/2026", "Vivek Bali", 1.0, 0.0, 0.0),
            record("garbage", "Vivek Bali", 1.0, 0.0, 0.0),
            record("18/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
            record("", "Vivek Bali", 1.0, 0.0, 0.0),
            record("01/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
        ];
        sort_newest_first(&mut records);
        assert_eq!(dates(&records), vec!["18/10/2026", "01/10/2026", "05/09/2026", "garbage", ""]);
    }

    #[test]
    fn filter_all_takes_prefix_in_order() {
        let records = vec![
            record("19/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
            record("18/10/2026", "Vikash Yadav", 1.0, 0.0, 0.0),
            record("17/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
        ];
        assert_eq!(filter(&records, 2, ALL_DRIVERS), records[..2].to_vec());
        assert_eq!(filter(&records, 30, ALL_DRIVERS).len(), 3);
        assert!(filter(&records, 0, ALL_DRIVERS).is_empty());
    }

    proptest! {
        #[test]
        fn filter_keeps_a_prefix_of_the_requested_length(
            drivers in prop::collection::vec(prop::sample::select(vec!["Vivek Bali", "Vikash Yadav"]), 0..40),
            period in 0usize..60,
        ) {
            let records: Vec<TripRecord> =
                drivers.iter().map(|d| record("19/10/2026", d, 1.0, 0.0, 0.0)).collect();

            let all = filter(&records, period, ALL_DRIVERS);
            prop_assert_eq!(all.len(), period.min(records.len()));
            prop_assert_eq!(&all[..], &records[..all.len()]);

            let one = filter(&records, period, "Vivek Bali");
            prop_assert!(one.iter().all(|r| r.driver == "Vivek Bali"));
            prop_assert_eq!(
                one.len(),
                records.iter().take(period).filter(|r| r.driver == "Vivek Bali").count()
            );
        }
    }

    #[test]
    fn driver_filter_applies_after_the_prefix() {
        let records = vec![
            record("19/10/2026", "Vikash Yadav", 1.0, 0.0, 0.0),
            record("18/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
            record("17/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
        ];
        assert_eq!(dates(&filter(&records, 2, "Vivek Bali")), vec!["18/10/2026"]);
        assert!(filter(&records, 3, "vivek bali").is_empty());
    }

    #[test]
    fn totals_sum_earnings_expenses_and_profit() {
        let records = vec![
            record("19/10/2026", "Vivek Bali", 1200.0, 100.0, 623.1),
            record("18/10/2026", "Vivek Bali", 800.0, 50.0, 300.0),
        ];
        let t = totals(&records);
        assert!((t.total_earnings - 2000.0).abs() < 1e-9);
        assert!((t.total_expenses - (150.0 + 2.0 * 127.0)).abs() < 1e-9);
        assert!((t.total_profit - 923.1).abs() < 1e-9);
        assert_eq!(totals(&[]).total_earnings, 0.0);
    }

    #[test]
    fn latest_day_prefers_todays_rows() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let records = vec![
            record("19/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
            record("18/10/2026", "Vivek Bali", 1.0, 0.0, 0.0),
        ];
        assert_eq!(latest_day(records.clone(), today).len(), 1);
        let older = records[1..].to_vec();
        assert_eq!(latest_day(older.clone(), today), older);
    }

    struct Fixture {
        guard: QuotaGuard,
        store: MemorySheetStore,
    }

    fn fixture(limits: QuotaLimits) -> Fixture {
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        let kv = Arc::new(MemoryKeyValueStore::new());
        Fixture {
            guard: QuotaGuard::new(kv, clock, limits),
            store: MemorySheetStore::new(),
        }
    }

    #[tokio::test]
    async fn live_load_sorts_caches_and_charges_quota_once() {
        let f = fixture(QuotaLimits::default());
        f.store
            .seed(None, vec![
                json!({"date": "17/10/2026", "driver": "Vivek Bali", "earnings": "10"}),
                json!({"date": "19/10/2026", "driver": "Vivek Bali", "earnings": "20"}),
            ])
            .await;

        let first = load_records(&f.guard, &f.store).await;
        assert_eq!(first.source, ReportSource::Live);
        assert_eq!(dates(&first.records), vec!["19/10/2026", "17/10/2026"]);
        assert_eq!(f.guard.used(QuotaKind::Report).await.unwrap(), 1);

        let second = load_records(&f.guard, &f.store).await;
        assert_eq!(second.source, ReportSource::Cache);
        assert_eq!(second.records, first.records);
        assert_eq!(f.store.fetch_count().await, 1);
        assert_eq!(f.guard.used(QuotaKind::Report).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn saved_row_joins_todays_cache_in_date_order() {
        let f = fixture(QuotaLimits::default());
        f.store
            .seed(None, vec![
                json!({"date": "17/10/2026", "driver": "Vivek Bali", "earnings": "10"}),
                json!({"date": "19/10/2026", "driver": "Vikash Yadav", "earnings": "20"}),
            ])
            .await;
        load_records(&f.guard, &f.store).await;

        remember_saved(&f.guard, &record("19/10/2026", "Vivek Bali", 30.0, 0.0, 0.0)).await;
        let load = load_records(&f.guard, &f.store).await;
        assert_eq!(load.source, ReportSource::Cache);
        assert_eq!(dates(&load.records), vec!["19/10/2026", "19/10/2026", "17/10/2026"]);
        assert_eq!(load.records[1].driver, "Vivek Bali");
        assert_eq!(f.store.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn saved_row_without_a_cache_leaves_it_absent() {
        let f = fixture(QuotaLimits::default());
        remember_saved(&f.guard, &record("19/10/2026", "Vivek Bali", 30.0, 0.0, 0.0)).await;
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(f.guard.get_cache(today).await.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_yesterday_without_charging() {
        let f = fixture(QuotaLimits::default());
        let yesterday_rows = vec![record("18/10/2026", "Vivek Bali", 5.0, 0.0, 1.0)];
        f.guard
            .set_cache(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), &yesterday_rows)
            .await
            .unwrap();
        f.store.set_fail(true).await;

        let load = load_records(&f.guard, &f.store).await;
        assert_eq!(load.source, ReportSource::Fallback);
        assert_eq!(load.records, yesterday_rows);
        assert!(load.message.is_some());
        assert_eq!(f.guard.used(QuotaKind::Report).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_without_any_cache_is_empty() {
        let f = fixture(QuotaLimits::default());
        f.store.set_fail(true).await;
        let load = load_records(&f.guard, &f.store).await;
        assert_eq!(load.source, ReportSource::Fallback);
        assert!(load.records.is_empty());
    }

    #[tokio::test]
    async fn exhausted_report_quota_skips_the_network() {
        let f = fixture(QuotaLimits { save: 100, report: 1 });
        f.guard.record_success(QuotaKind::Report).await.unwrap();
        f.store.seed(None, vec![json!({"date": "19/10/2026", "driver": "Vivek Bali"})]).await;

        let load = load_records(&f.guard, &f.store).await;
        assert_eq!(load.source, ReportSource::Fallback);
        assert_eq!(f.store.fetch_count().await, 0);
        assert!(load.message.unwrap().contains("quota"));
    }
}
