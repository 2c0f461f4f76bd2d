//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Transport or service failure talking to the generative text service.
    #[error("AI request failed: {0}")]
    Ai(String),

    /// A required setting (e.g. the API key) is absent.
    #[error("Not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// Reply text did not parse into the declared shape.
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("UI error: {0}")]
    Ui(String),
}
