//! Provider selection for the generative text service.

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model for creative writing calls.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Which generative text provider to call, and how to reach it.
///
/// This is an explicit configuration value passed into
/// [`TextGenClient::new`](crate::TextGenClient::new) — never ambient
/// state — so two clients with different providers can coexist in one
/// process.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        model: String,
        /// Overridable so tests and self-hosted proxies can redirect calls.
        base_url: String,
    },
    Ollama {
        endpoint: String,
        model: String,
    },
}

impl ProviderConfig {
    /// Gemini with the default model and endpoint.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Ollama at the default local endpoint.
    pub fn ollama() -> Self {
        Self::Ollama {
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }

    /// Human-readable provider name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "gemini",
            Self::Ollama { .. } => "ollama",
        }
    }
}
