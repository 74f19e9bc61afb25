use thiserror::Error;

/// Failure of a single text-generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No credential configured; raised before any network I/O.
    #[error("API key is not set (export GEMINI_API_KEY or run `pdc init`)")]
    MissingApiKey,

    #[error("request to the generation service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("the model returned an empty response")]
    EmptyResponse,

    #[error("could not parse the model response: {0}")]
    Malformed(#[from] serde_json::Error),
}
