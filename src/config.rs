use clap::{Parser, ValueEnum};

// Where generated summaries are cached
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    // shared across instances
    Redis,
    // process-local
    Memory,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "summarize-gateway")]
#[command(about = "Cached seq2seq summarization endpoint")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    // Shared cache store
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379/0")]
    pub redis_url: String,

    // Model served by the inference endpoint
    #[arg(short, long, env = "MODEL_NAME", default_value = "t5-base")]
    pub model_name: String,

    // Inference server base url, scheme optional
    #[arg(long, env = "MODEL_ENDPOINT", default_value = "http://localhost:8080")]
    pub model_endpoint: String,

    // Bearer token for the inference server
    #[arg(long, env = "MODEL_API_TOKEN", hide_env_values = true)]
    pub model_api_token: Option<String>,

    #[arg(long, env = "CACHE_BACKEND", value_enum, default_value_t = CacheBackend::Redis)]
    pub cache_backend: CacheBackend,

    // Cache TTL in seconds
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 86_400,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub cache_ttl: u64,

    // Pending generations before callers wait on the queue
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,
}
