use crate::summarizer::Summarizer;

// app's shared state, built once at startup
pub struct AppState {
    pub summarizer: Summarizer,
    pub model_name: String, // reported by /health
}
