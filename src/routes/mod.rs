/// Application routes configuration
use crate::handlers::{
    delete_report, get_reference, get_report, get_statistics, health, list_reports, submit_report,
    update_report, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Report CRUD
        .route("/api/report", post(submit_report))
        .route(
            "/api/report/:id",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/api/reports", get(list_reports))
        // Headquarters view
        .route("/api/statistics", get(get_statistics))
        // Fixed reference data
        .route("/api/reference", get(get_reference))
        .with_state(state)
}
