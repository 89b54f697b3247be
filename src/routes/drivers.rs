use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::{driver, quota};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/drivers", get(driver::list_drivers))
        .route("/quota", get(quota::get_quota))
}
