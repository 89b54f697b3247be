use axum::{extract::State, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::services::quota::{QuotaKind, QuotaUsage};

pub async fn get_quota(State(state): State<AppState>) -> Result<Json<Vec<QuotaUsage>>, AppError> {
    Ok(Json(vec![
        state.guard.usage(QuotaKind::Save).await?,
        state.guard.usage(QuotaKind::Report).await?,
    ]))
}
