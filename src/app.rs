use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/save-subject", post(handlers::save_subject))
        .route("/save-log", post(handlers::save_log))
        .route("/summary", get(handlers::summary))
        .with_state(state)
}
