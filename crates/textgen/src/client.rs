//! REST client for the generative text service.
//!
//! Wraps the Gemini `generateContent` endpoint and the Ollama
//! `/api/generate` endpoint behind a single
//! `generate(prompt, system_instruction) -> text` call using [`reqwest`].

use serde::Deserialize;

use crate::provider::ProviderConfig;

/// Errors from the generative text service layer.
#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Text service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered 2xx but produced no text.
    #[error("Text service returned an empty response")]
    Empty,
}

/// HTTP client for a single provider configuration.
pub struct TextGenClient {
    client: reqwest::Client,
    provider: ProviderConfig,
}

impl TextGenClient {
    /// Create a client for the given provider.
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across providers).
    pub fn with_client(client: reqwest::Client, provider: ProviderConfig) -> Self {
        Self { client, provider }
    }

    /// The provider this client talks to.
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Execute a generation call against the configured provider.
    ///
    /// Suspends the caller until the service answers; the caller's
    /// in-memory state is never touched from here.
    pub async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, TextGenError> {
        let text = match &self.provider {
            ProviderConfig::Gemini {
                api_key,
                model,
                base_url,
            } => {
                let url = format!("{base_url}/v1beta/models/{model}:generateContent");
                let response = self
                    .client
                    .post(&url)
                    .header("x-goog-api-key", api_key)
                    .json(&gemini_request_body(prompt, system_instruction))
                    .send()
                    .await?;
                let response = check_status(response).await?;
                let parsed: GeminiResponse = response.json().await?;
                parsed.text()
            }
            ProviderConfig::Ollama { endpoint, model } => {
                let response = self
                    .client
                    .post(format!("{endpoint}/api/generate"))
                    .json(&ollama_request_body(model, prompt, system_instruction))
                    .send()
                    .await?;
                let response = check_status(response).await?;
                let parsed: OllamaResponse = response.json().await?;
                parsed.response
            }
        };

        if text.trim().is_empty() {
            return Err(TextGenError::Empty);
        }

        tracing::debug!(
            provider = self.provider.name(),
            response_chars = text.len(),
            "Generation call completed",
        );
        Ok(text)
    }
}

/// Probe an Ollama endpoint for reachability (`GET /api/tags`).
pub async fn check_ollama(endpoint: &str) -> bool {
    match reqwest::get(format!("{endpoint}/api/tags")).await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Map a non-2xx response to [`TextGenError::Api`], keeping the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TextGenError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(TextGenError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

/// Gemini `generateContent` request body. Temperature/topP are tuned for
/// creative prose rather than deterministic extraction.
fn gemini_request_body(prompt: &str, system_instruction: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "systemInstruction": { "parts": [{ "text": system_instruction }] },
        "generationConfig": { "temperature": 0.8, "topP": 0.95 },
    })
}

/// Ollama `/api/generate` request body. Ollama has no separate system
/// field in this endpoint, so the instruction is folded into the prompt.
fn ollama_request_body(model: &str, prompt: &str, system_instruction: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "prompt": format!("System: {system_instruction}\n\nUser: {prompt}"),
        "stream": false,
    })
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenate the text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
