pub mod cash;
pub mod drivers;
pub mod reports;
pub mod trips;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(drivers::routes())
        .merge(trips::routes())
        .merge(reports::routes())
        .merge(cash::routes())
}

/// Full application under the /FleetPay base path.
pub fn build_app(app_state: AppState) -> Router {
    let api = create_router()
        .route("/", get(|| async { "FleetPay API" }))
        .route("/health", get(health_check));

    Router::new()
        .nest("/FleetPay", api)
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health_check() -> &'static str {
    "OK"
}
