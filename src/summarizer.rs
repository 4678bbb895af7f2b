use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ResultCache, SUMMARY_TTL, derive_key};
use crate::error::SummarizeError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES};
use crate::model::ModelBackend;
use crate::models::{SummarizeRequest, SummarizeResponse};
use crate::normalize::normalize;

/// Request orchestrator: validate, probe the cache, generate, store.
///
/// There is no locking between the probe and the store. Two identical
/// requests that both miss will both generate and both write the same key.
#[derive(Clone)]
pub struct Summarizer {
    backend: Arc<dyn ModelBackend>,
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn ModelBackend>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            backend,
            cache,
            ttl: SUMMARY_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn summarize(&self, req: &SummarizeRequest) -> Result<SummarizeResponse, SummarizeError> {
        let normalized = normalize(req)?;
        let params = normalized.params;
        let key = derive_key(&normalized.prompt, params.max_length, params.min_length, params.num_beams);

        if normalized.use_cache {
            // empty values count as a miss
            if let Some(summary) = self.cache.get(&key).await?.filter(|s| !s.is_empty()) {
                CACHE_HITS.inc();
                tracing::info!(cache_key = %key, "cache hit");
                return Ok(SummarizeResponse { summary, cached: true });
            }
            CACHE_MISSES.inc();
            tracing::info!(cache_key = %key, "cache miss");
        }

        let summary = self.backend.generate(&normalized.prompt, &params).await?;

        if normalized.use_cache {
            self.cache.set(&key, &summary, self.ttl).await?;
        }

        Ok(SummarizeResponse { summary, cached: false })
    }
}
