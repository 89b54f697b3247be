use axum::{extract::State, Json};
use axum::http::StatusCode;
use crate::clock::sheet_date;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::trip::{
    LatestRecordsResponse, PaymentResponse, SaveTripResponse, TripPaymentRequest,
};
use crate::services::payment::{compute, to_record};
use crate::services::quota::QuotaKind;
use crate::services::report::{latest_day, load_records, remember_saved};

pub async fn calculate_payment(
    State(state): State<AppState>,
    Json(req): Json<TripPaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let input = req.into_input(&state.roster)?;
    let breakdown = compute(&input);
    Ok(Json(PaymentResponse::new(&input.driver.name, &breakdown)))
}

pub async fn save_trip(
    State(state): State<AppState>,
    Json(req): Json<TripPaymentRequest>,
) -> Result<(StatusCode, Json<SaveTripResponse>), AppError> {
    let cap = state.guard.cap(QuotaKind::Save);
    if !state.guard.can_proceed(QuotaKind::Save).await? {
        tracing::warn!(cap, "Monthly save quota reached, rejecting save");
        return Err(AppError::quota(format!(
            "Monthly save quota reached ({cap} calls). Please try again next month."
        )));
    }

    let input = req.into_input(&state.roster)?;
    let breakdown = compute(&input);
    let record = to_record(&input, &breakdown, sheet_date(state.clock.today()));
    let row = serde_json::to_value(&record)
        .map_err(|e| AppError::internal(format!("Failed to encode trip row: {e}")))?;

    state.trip_store.append(None, vec![row]).await.map_err(|e| {
        tracing::error!(driver = %record.driver, error = %e, "Trip save failed");
        e
    })?;

    // The row is already in the sheet; a counter failure must not undo that
    let quota_used = match state.guard.record_success(QuotaKind::Save).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::error!(error = %e, "Failed to record save quota");
            None
        }
    };
    remember_saved(&state.guard, &record).await;
    tracing::info!(driver = %record.driver, date = %record.date, "Trip saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveTripResponse {
            payment: PaymentResponse::new(&input.driver.name, &breakdown),
            record,
            quota_used,
            quota_cap: cap,
            message: "Data saved successfully".to_string(),
        }),
    ))
}

pub async fn latest_records(
    State(state): State<AppState>,
) -> Json<LatestRecordsResponse> {
    let load = load_records(&state.guard, state.trip_store.as_ref()).await;
    Json(LatestRecordsResponse {
        records: latest_day(load.records, state.clock.today()),
        source: load.source,
    })
}
