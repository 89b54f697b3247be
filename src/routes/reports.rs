use axum::{
    routing::{get, post},
    Router,
};
use crate::state::AppState;
use crate::handlers::report;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(report::get_report))
        .route("/reports/periods", get(report::list_periods))
        .route("/reports/archive-latest", post(report::archive_latest))
}
