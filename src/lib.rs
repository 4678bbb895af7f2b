pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod models;
pub mod normalize;
pub mod state;
pub mod summarizer;
pub mod worker;

use axum::{Router, routing::{get, post}};
use std::sync::Arc;

use crate::handlers::{health_handler, metrics_handler, summarize_handler};
use crate::state::AppState;

// creating the router with routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/summarize", post(summarize_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
