use serde::{Deserialize, Serialize};

fn default_max_length() -> i64 {
    60
}

fn default_min_length() -> i64 {
    10
}

fn default_num_beams() -> i64 {
    4
}

fn default_use_cache() -> bool {
    true
}

// POST /summarize request body
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_max_length")]
    pub max_length: i64,
    #[serde(default = "default_min_length")]
    pub min_length: i64,
    #[serde(default = "default_num_beams")]
    pub num_beams: i64,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

impl SummarizeRequest {
    // Request with default decoding parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            num_beams: default_num_beams(),
            use_cache: default_use_cache(),
        }
    }
}

// POST /summarize response body
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SummarizeResponse {
    pub summary: String,
    pub cached: bool,
}

/// Decoding parameters handed to the model backend.
///
/// `max_length`, `min_length` and `num_beams` come from the caller and are
/// passed through without range checks; the remaining fields are fixed.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodingParams {
    pub max_length: i64,
    pub min_length: i64,
    pub num_beams: i64,
    pub early_stopping: bool,
    pub no_repeat_ngram_size: i64,
}

impl DecodingParams {
    pub const NO_REPEAT_NGRAM_SIZE: i64 = 3;

    pub fn new(max_length: i64, min_length: i64, num_beams: i64) -> Self {
        Self {
            max_length,
            min_length,
            num_beams,
            early_stopping: true,
            no_repeat_ngram_size: Self::NO_REPEAT_NGRAM_SIZE,
        }
    }
}
