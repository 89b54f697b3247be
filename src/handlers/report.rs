use axum::{extract::{rejection::QueryRejection, Query, State}, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::report::{ArchiveResponse, PeriodOption, ReportQuery, ReportResponse};
use crate::services::quota::QuotaKind;
use crate::services::report::{filter, load_records, remember_saved, totals, PERIODS};

pub async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ReportResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let load = load_records(&state.guard, state.trip_store.as_ref()).await;
    let rows = filter(&load.records, query.period, &query.driver);

    Ok(Json(ReportResponse {
        totals: totals(&rows),
        period: query.period,
        driver: query.driver,
        rows,
        source: load.source,
        message: load.message,
    }))
}

pub async fn list_periods() -> Json<Vec<PeriodOption>> {
    Json(
        PERIODS
            .iter()
            .map(|(label, value)| PeriodOption { label: *label, value: *value })
            .collect(),
    )
}

/// Re-appends the newest record unless the sheet already has one for the
/// same date and driver.
pub async fn archive_latest(
    State(state): State<AppState>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let load = load_records(&state.guard, state.trip_store.as_ref()).await;
    let latest = load
        .records
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("No last day record found."))?;

    let existing = state
        .trip_store
        .search(None, &[("date", latest.date.as_str()), ("driver", latest.driver.as_str())])
        .await;
    match existing {
        Ok(existing) if !existing.is_empty() => {
            return Ok(Json(ArchiveResponse {
                archived: false,
                record: latest,
                message: "Last day report already exists.".to_string(),
            }));
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Duplicate check failed, saving anyway"),
    }

    let cap = state.guard.cap(QuotaKind::Save);
    if !state.guard.can_proceed(QuotaKind::Save).await? {
        return Err(AppError::quota(format!(
            "Monthly save quota reached ({cap} calls). Please try again next month."
        )));
    }

    let row = serde_json::to_value(&latest)
        .map_err(|e| AppError::internal(format!("Failed to encode trip row: {e}")))?;
    state.trip_store.append(None, vec![row]).await?;
    if let Err(e) = state.guard.record_success(QuotaKind::Save).await {
        tracing::error!(error = %e, "Failed to record save quota");
    }
    remember_saved(&state.guard, &latest).await;
    tracing::info!(date = %latest.date, driver = %latest.driver, "Archived last day report");

    Ok(Json(ArchiveResponse {
        archived: true,
        record: latest,
        message: "Last day report saved.".to_string(),
    }))
}
