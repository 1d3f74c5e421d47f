use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dreams", get(handlers::list_dreams).post(handlers::add_dream))
        .route("/api/dream-signs", get(handlers::dream_signs))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:id", put(handlers::update_goal))
        .route("/api/goals/:id/complete", post(handlers::complete_goal))
        .route("/api/goals/:id/reactivate", post(handlers::reactivate_goal))
        .route("/api/goals/:id/progress/increment", post(handlers::increment_progress))
        .route("/api/goals/:id/progress/decrement", post(handlers::decrement_progress))
        .route("/api/goals/:id/delete", post(handlers::request_delete))
        .route("/api/goals/:id/delete/confirm", post(handlers::confirm_delete))
        .route("/api/goals/:id/delete/cancel", post(handlers::cancel_delete))
        .route("/api/stats/monthly", get(handlers::monthly_stats))
        .route("/api/stats/yearly", get(handlers::yearly_stats))
        .route("/api/stats/lifetime", get(handlers::lifetime_stats))
        .with_state(state)
}
