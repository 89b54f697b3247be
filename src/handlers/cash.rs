use axum::{extract::State, Json};
use axum::http::StatusCode;
use serde_json::{json, Value};
use crate::clock::sheet_date;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::cash::{AccountantCashRequest, DriverCashRequest, PendingBatchResponse};
use crate::services::ledger::{CashTotal, SaveOutcome};

/// Last known total. Does not touch the store.
pub async fn get_total(State(state): State<AppState>) -> Json<CashTotal> {
    Json(CashTotal {
        total: state.cash_book.cached_total().await,
        refreshed: false,
        message: None,
    })
}

pub async fn refresh_total(State(state): State<AppState>) -> Json<CashTotal> {
    Json(state.cash_book.refresh().await)
}

pub async fn list_pending(State(state): State<AppState>) -> Json<PendingBatchResponse> {
    Json(PendingBatchResponse::new(state.cash_book.pending().await))
}

pub async fn add_driver_entry(
    State(state): State<AppState>,
    Json(req): Json<DriverCashRequest>,
) -> Result<(StatusCode, Json<PendingBatchResponse>), AppError> {
    let driver = state
        .roster
        .find(&req.driver)
        .ok_or_else(|| AppError::validation(format!("Unknown driver '{}'", req.driver)))?;

    let entries = state
        .cash_book
        .add_driver_entry(&driver.name, req.amount, sheet_date(state.clock.today()))
        .await?;

    Ok((StatusCode::CREATED, Json(PendingBatchResponse::new(entries))))
}

pub async fn clear_pending(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.cash_book.clear_pending().await;
    Json(json!({ "cleared": cleared }))
}

pub async fn submit_pending(
    State(state): State<AppState>,
) -> Result<Json<SaveOutcome>, AppError> {
    Ok(Json(state.cash_book.submit_pending().await?))
}

pub async fn add_accountant_entry(
    State(state): State<AppState>,
    Json(req): Json<AccountantCashRequest>,
) -> Result<(StatusCode, Json<SaveOutcome>), AppError> {
    let outcome = state
        .cash_book
        .add_accountant_entry(req.accountant_type, req.amount, sheet_date(state.clock.today()))
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
