use thiserror::Error;

/// Validation failures raised while turning raw parameters into a
/// [`CardRequest`](super::card::CardRequest).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("expected a single `{key}` parameter")]
    DuplicateParameter { key: &'static str },
    #[error("invalid font size `{value}`: {reason}")]
    InvalidFontSize { value: String, reason: &'static str },
}

impl RequestError {
    pub fn duplicate(key: &'static str) -> Self {
        Self::DuplicateParameter { key }
    }

    pub fn invalid_font_size(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidFontSize {
            value: value.into(),
            reason,
        }
    }
}
