use axum::{
    routing::{get, post},
    Router,
};
use crate::state::AppState;
use crate::handlers::trip;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trips", post(trip::save_trip))
        .route("/trips/calculate", post(trip::calculate_payment))
        .route("/trips/latest", get(trip::latest_records))
}
