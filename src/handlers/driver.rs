use axum::{extract::State, Json};
use crate::state::AppState;
use crate::dtos::driver::DriverResponse;

pub async fn list_drivers(State(state): State<AppState>) -> Json<Vec<DriverResponse>> {
    Json(state.roster.drivers().iter().map(DriverResponse::from).collect())
}
