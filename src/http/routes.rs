use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{check_rated_handler, overall_average_handler, submit_handler},
    state::AppState,
};

/// Routes served under `/api`.
pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/submit", post(submit_handler))
        .route("/overall-average", get(overall_average_handler))
        .route("/check-rated", get(check_rated_handler))
        .with_state(state)
}
