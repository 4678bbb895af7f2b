use crate::error::SummarizeError;
use crate::models::{DecodingParams, SummarizeRequest};

/// Instruction prefix the model expects in front of the document.
///
/// It is part of the hashed cache input, so changing it changes every key.
pub const PROMPT_PREFIX: &str = "summarize: ";

// Canonical form of a request: prompt + decoding params
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub prompt: String,
    pub params: DecodingParams,
    pub use_cache: bool,
}

/// Trim the text, reject it if nothing is left, and build the model prompt.
pub fn normalize(req: &SummarizeRequest) -> Result<NormalizedRequest, SummarizeError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(SummarizeError::InvalidInput("Empty text".to_string()));
    }

    Ok(NormalizedRequest {
        prompt: format!("{PROMPT_PREFIX}{text}"),
        params: DecodingParams::new(req.max_length, req.min_length, req.num_beams),
        use_cache: req.use_cache,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_text_rejected() {
        for text in ["", "   ", "\n\t "] {
            let err = normalize(&SummarizeRequest::new(text)).unwrap_err();
            assert!(matches!(err, SummarizeError::InvalidInput(_)), "{text:?}");
        }
    }

    #[test]
    fn text_is_trimmed_and_prefixed() {
        let normalized = normalize(&SummarizeRequest::new("  hello  ")).unwrap();
        assert_eq!(normalized.prompt, "summarize: hello");
    }

    #[test]
    fn inner_whitespace_is_kept() {
        let normalized = normalize(&SummarizeRequest::new(" a  b\nc ")).unwrap();
        assert_eq!(normalized.prompt, "summarize: a  b\nc");
    }

    #[test]
    fn numeric_params_pass_through_unchecked() {
        let mut req = SummarizeRequest::new("text");
        req.max_length = -1;
        req.min_length = 500;
        req.num_beams = 0;
        req.use_cache = false;

        let normalized = normalize(&req).unwrap();
        assert_eq!(normalized.params.max_length, -1);
        assert_eq!(normalized.params.min_length, 500);
        assert_eq!(normalized.params.num_beams, 0);
        assert!(!normalized.use_cache);
    }
}
