use inkstone_textgen::provider::{
    ProviderConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_OLLAMA_ENDPOINT,
    DEFAULT_OLLAMA_MODEL,
};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Generative text provider, resolved once at startup and passed into
    /// the client explicitly — never read again as ambient state.
    pub textgen: ProviderConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `TEXTGEN_PROVIDER`     | `gemini`                   |
    /// | `GEMINI_API_KEY`       | *(empty)*                  |
    /// | `GEMINI_MODEL`         | `gemini-3-pro-preview`     |
    /// | `GEMINI_BASE_URL`      | Google endpoint            |
    /// | `OLLAMA_ENDPOINT`      | `http://localhost:11434`   |
    /// | `OLLAMA_MODEL`         | `llama3`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            textgen: provider_from_env(),
        }
    }
}

/// Resolve the generative text provider from the environment.
///
/// Panics on an unknown `TEXTGEN_PROVIDER` — misconfiguration should fail
/// fast at startup, not at the first generation call.
fn provider_from_env() -> ProviderConfig {
    let provider = std::env::var("TEXTGEN_PROVIDER").unwrap_or_else(|_| "gemini".into());
    match provider.as_str() {
        "gemini" => ProviderConfig::Gemini {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
        },
        "ollama" => ProviderConfig::Ollama {
            endpoint: std::env::var("OLLAMA_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_ENDPOINT.into()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.into()),
        },
        other => panic!("Unknown TEXTGEN_PROVIDER '{other}' (expected 'gemini' or 'ollama')"),
    }
}
