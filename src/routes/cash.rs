use axum::{
    routing::{get, post},
    Router,
};
use crate::state::AppState;
use crate::handlers::cash;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash", get(cash::get_total))
        .route("/cash/refresh", post(cash::refresh_total))
        .route(
            "/cash/driver-entries",
            get(cash::list_pending)
                .post(cash::add_driver_entry)
                .delete(cash::clear_pending),
        )
        .route("/cash/driver-entries/submit", post(cash::submit_pending))
        .route("/cash/accountant-entries", post(cash::add_accountant_entry))
}
