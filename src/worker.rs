use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

use crate::metrics::{GENERATION_FAILURES, GENERATION_LATENCY};
use crate::model::{BackendError, ModelBackend};
use crate::models::DecodingParams;

// Queued generation - prompt + params + reply channel
pub struct GenerationJob {
    pub prompt: String,
    pub params: DecodingParams,
    pub response_tx: oneshot::Sender<Result<String, BackendError>>, // one-time channel for the result
}

/// Handle to the generation worker.
///
/// All generations funnel through one queue so the single model instance
/// runs one job at a time. Implements [`ModelBackend`] itself, so callers
/// cannot tell it apart from a direct backend.
#[derive(Clone)]
pub struct ModelQueue {
    tx: mpsc::Sender<GenerationJob>,
}

#[async_trait]
impl ModelBackend for ModelQueue {
    async fn generate(&self, prompt: &str, params: &DecodingParams) -> Result<String, BackendError> {
        let (response_tx, response_rx) = oneshot::channel();

        let job = GenerationJob {
            prompt: prompt.to_string(),
            params: *params,
            response_tx,
        };

        self.tx
            .send(job)
            .await
            .map_err(|_| BackendError::WorkerUnavailable)?;

        // wait for the worker to reply
        response_rx.await.map_err(|_| BackendError::WorkerUnavailable)?
    }
}

/// Start the worker task and return the queue that feeds it.
pub fn spawn_generation_worker(backend: Arc<dyn ModelBackend>, capacity: usize) -> ModelQueue {
    let (tx, rx) = mpsc::channel::<GenerationJob>(capacity.max(1));
    tokio::spawn(generation_worker(rx, backend));
    ModelQueue { tx }
}

// Background worker -> runs generations from the queue one by one
async fn generation_worker(mut rx: mpsc::Receiver<GenerationJob>, backend: Arc<dyn ModelBackend>) {
    tracing::info!("generation worker started");

    while let Some(job) = rx.recv().await {
        let start = Instant::now();
        let result = backend.generate(&job.prompt, &job.params).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                GENERATION_LATENCY.observe(elapsed.as_secs_f64());
                tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "generation finished");
            }
            Err(e) => {
                GENERATION_FAILURES.inc();
                tracing::warn!(error = %e, "generation failed");
            }
        }

        // caller may have gone away; nothing to do then
        let _ = job.response_tx.send(result);
    }

    tracing::info!("generation worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // Tracks how many generations overlap
    #[derive(Default)]
    struct SlowBackend {
        running: AtomicUsize,
        max_running: AtomicUsize,
    }

    #[async_trait]
    impl ModelBackend for SlowBackend {
        async fn generate(&self, prompt: &str, _params: &DecodingParams) -> Result<String, BackendError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("summary of {prompt}"))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ModelBackend for FailingBackend {
        async fn generate(&self, _prompt: &str, _params: &DecodingParams) -> Result<String, BackendError> {
            Err(BackendError::Generation("out of memory".to_string()))
        }
    }

    #[tokio::test]
    async fn queue_returns_backend_output() {
        let queue = spawn_generation_worker(Arc::new(SlowBackend::default()), 4);
        let out = queue.generate("a", &DecodingParams::new(60, 10, 4)).await.unwrap();
        assert_eq!(out, "summary of a");
    }

    #[tokio::test]
    async fn concurrent_jobs_run_one_at_a_time() {
        let backend = Arc::new(SlowBackend::default());
        let queue = spawn_generation_worker(backend.clone(), 8);
        let params = DecodingParams::new(60, 10, 4);

        let handles: Vec<_> = (0..4)
            .map(move |i| {
                let queue = queue.clone();
                tokio::spawn(async move { queue.generate(&format!("p{i}"), &params).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(backend.max_running.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_error_reaches_caller() {
        let queue = spawn_generation_worker(Arc::new(FailingBackend), 1);
        let err = queue.generate("a", &DecodingParams::new(60, 10, 4)).await.unwrap_err();
        assert!(matches!(err, BackendError::Generation(_)));
    }

    #[tokio::test]
    async fn closed_queue_is_worker_unavailable() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let queue = ModelQueue { tx };

        let err = queue.generate("a", &DecodingParams::new(60, 10, 4)).await.unwrap_err();
        assert!(matches!(err, BackendError::WorkerUnavailable));
    }
}
