pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pagination API
        .route("/api/v1/paginate", post(handlers::handle_paginate))
        .route("/api/v1/paginate/plan", post(handlers::handle_plan))
        .with_state(state)
}
