use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use summarize_gateway::app;
use summarize_gateway::cache::{MemoryCache, RedisCache, ResultCache};
use summarize_gateway::config::{Args, CacheBackend};
use summarize_gateway::model::{InferenceClient, ModelBackend};
use summarize_gateway::state::AppState;
use summarize_gateway::summarizer::Summarizer;
use summarize_gateway::worker::spawn_generation_worker;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // one model handle for the whole process, behind the generation worker
    let inference = InferenceClient::new(&args.model_endpoint, &args.model_name, args.model_api_token.clone());
    tracing::info!(model = %args.model_name, url = inference.url(), "using inference endpoint");
    let backend: Arc<dyn ModelBackend> = Arc::new(spawn_generation_worker(Arc::new(inference), args.queue_capacity));

    let cache: Arc<dyn ResultCache> = match args.cache_backend {
        CacheBackend::Redis => {
            tracing::info!(redis_url = %args.redis_url, "using redis cache");
            Arc::new(RedisCache::new(&args.redis_url)?)
        }
        CacheBackend::Memory => {
            tracing::info!("using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    };

    let summarizer = Summarizer::new(backend, cache).with_ttl(Duration::from_secs(args.cache_ttl));
    let cache_ttl = summarizer.ttl().as_secs();
    let state = Arc::new(AppState {
        summarizer,
        model_name: args.model_name.clone(),
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(port = args.port, cache_ttl, "summarizer listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
