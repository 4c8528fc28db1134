//! HTTP request handlers, grouped by resource.

pub mod codex;
pub mod health;
pub mod projects;
pub mod scenes;
