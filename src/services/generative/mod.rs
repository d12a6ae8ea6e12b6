/// Generative-text abstraction used for director picks and cycle copy
///
/// Every caller has a heuristic fallback, so a missing or failing generator
/// only degrades output quality.
use async_trait::async_trait;

pub mod gemini;

pub use gemini::GeminiClient;

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Generation API returned no text")]
    EmptyResponse,

    #[error("Generated text unusable: {0}")]
    Unusable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw text produced for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
