//! HTTP client for the generative text service.
//!
//! Supports two providers behind one call shape: Google Gemini (hosted)
//! and Ollama (local-first). Which one is used is decided by the
//! [`ProviderConfig`] value handed to the client at construction time —
//! there is deliberately no process-wide provider state.

pub mod client;
pub mod provider;

pub use client::{check_ollama, TextGenClient, TextGenError};
pub use provider::ProviderConfig;
