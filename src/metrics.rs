use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("summarize_requests_total", "Total number of summarize requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("summarize_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("summarize_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "summarize_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "summarize_generation_latency_seconds",
        "Model generation latency in seconds",
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap();
    pub static ref GENERATION_FAILURES: Counter =
        register_counter!("summarize_generation_failures_total", "Total failed generations").unwrap();
    // only tracked by the in-memory store
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("summarize_cache_size", "Current number of items in the in-memory cache").unwrap();
}
