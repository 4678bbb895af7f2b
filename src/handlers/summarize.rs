use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use crate::error::SummarizeError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{SummarizeRequest, SummarizeResponse};
use crate::state::AppState;

pub async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, SummarizeError> {
    REQUEST_TOTAL.inc();

    let start_time = Instant::now();
    let response = state.summarizer.summarize(&payload).await?;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(response))
}
