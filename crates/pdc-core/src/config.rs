use std::env;
use std::fmt;
use std::time::Duration;

/// Text-generation service configuration.
///
/// The `env_*` accessors read `GEMINI_API_KEY` (falling back to `API_KEY`),
/// `PDC_GEMINI_MODEL` and `PDC_GEMINI_BASE_URL`; callers layer them over
/// their own sources.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` makes every generation call fail without network I/O.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL up to and including the API version segment.
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// API key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    ///
    /// Blank values count as unset, so an empty `GEMINI_API_KEY` still
    /// falls through to `API_KEY`.
    pub fn env_api_key() -> Option<String> {
        env_var("GEMINI_API_KEY").or_else(|| env_var("API_KEY"))
    }

    /// Model override from `PDC_GEMINI_MODEL`.
    pub fn env_model() -> Option<String> {
        env_var("PDC_GEMINI_MODEL")
    }

    /// Base URL override from `PDC_GEMINI_BASE_URL`.
    pub fn env_base_url() -> Option<String> {
        env_var("PDC_GEMINI_BASE_URL")
    }

    /// Build a config from an explicit key (useful for tests and CLI flags).
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(|k| k.trim().to_owned()).filter(|k| !k.is_empty()),
            model: Self::DEFAULT_MODEL.to_owned(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
