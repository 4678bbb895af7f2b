//! Model backend seam.
//!
//! The seq2seq model lives behind an inference server speaking the
//! Hugging Face pipeline protocol. One client is built at startup and
//! shared by every request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DecodingParams;

/// Errors raised while tokenizing or generating
#[derive(Debug, Error)]
pub enum BackendError {
    /// Inference server could not be reached
    #[error("model request failed: {0}")]
    Transport(String),

    /// Inference server rejected or failed the generation
    #[error("generation failed: {0}")]
    Generation(String),

    /// Response did not carry generated text
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// Generation worker is gone
    #[error("generation worker unavailable")]
    WorkerUnavailable,
}

/// Anything that can turn a prompt into a summary
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, prompt: &str, params: &DecodingParams) -> Result<String, BackendError>;
}

#[derive(Serialize)]
struct InferencePayload<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    #[serde(flatten)]
    decoding: DecodingParams,
    clean_up_tokenization_spaces: bool,
}

#[derive(Deserialize)]
struct InferenceOutput {
    summary_text: Option<String>,
    generated_text: Option<String>,
}

// HTTP client for a pipeline-style inference server
pub struct InferenceClient {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl InferenceClient {
    // endpoint may omit the scheme: "localhost:8080"
    pub fn new(endpoint: &str, model_name: &str, api_token: Option<String>) -> Self {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };

        Self {
            client: reqwest::Client::new(),
            url: format!("{}/models/{}", base, model_name),
            api_token,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ModelBackend for InferenceClient {
    async fn generate(&self, prompt: &str, params: &DecodingParams) -> Result<String, BackendError> {
        let payload = InferencePayload {
            inputs: prompt,
            parameters: InferenceParameters {
                decoding: *params,
                clean_up_tokenization_spaces: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let res = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::Generation(format!("{status}: {body}")));
        }

        let outputs: Vec<InferenceOutput> = res
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        outputs
            .into_iter()
            .next()
            .and_then(|out| out.summary_text.or(out.generated_text))
            .ok_or_else(|| BackendError::MalformedResponse("no generated text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_gets_scheme_and_model_path() {
        let client = InferenceClient::new("localhost:8080/", "t5-base", None);
        assert_eq!(client.url(), "http://localhost:8080/models/t5-base");

        let client = InferenceClient::new("https://infer.internal", "t5-small", None);
        assert_eq!(client.url(), "https://infer.internal/models/t5-small");
    }

    #[test]
    fn host_named_like_a_scheme_still_gets_one() {
        let client = InferenceClient::new("httpd-infer:8080", "t5-base", None);
        assert_eq!(client.url(), "http://httpd-infer:8080/models/t5-base");
    }

    #[test]
    fn payload_carries_fixed_decoding_settings() {
        let payload = InferencePayload {
            inputs: "summarize: text",
            parameters: InferenceParameters {
                decoding: DecodingParams::new(20, 5, 2),
                clean_up_tokenization_spaces: true,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inputs": "summarize: text",
                "parameters": {
                    "max_length": 20,
                    "min_length": 5,
                    "num_beams": 2,
                    "early_stopping": true,
                    "no_repeat_ngram_size": 3,
                    "clean_up_tokenization_spaces": true
                }
            })
        );
    }
}
