use thiserror::Error;

use crate::domain::card::CardRequest;

/// Structured errors surfaced by the card pipeline. Any of them aborts the
/// render; there is no partial output.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown rendering failed: {message}")]
    Markdown { message: String },
    #[error("template rendering failed: {template}: {message}")]
    Template {
        template: &'static str,
        message: String,
    },
}

/// Trait exposed by the card pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &CardRequest) -> Result<String, RenderError>;
}
