use std::fmt;

use ammonia::Builder as AmmoniaBuilder;

/// HTML that is safe to embed in the card document.
///
/// The constructors are the only way to obtain one, so every place where
/// caller input reaches the document names how it was made safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Escape arbitrary text for HTML text and attribute contexts.
    pub fn escape(raw: &str) -> Self {
        Self(ammonia::clean_text(raw))
    }

    /// Accept markdown renderer output without sanitising it. Raw HTML in the
    /// markdown source passes through unchanged.
    pub fn from_trusted_markdown(html: String) -> Self {
        Self(html)
    }

    /// Run HTML through an allow-list sanitiser.
    pub fn from_cleaned_html(sanitizer: &AmmoniaBuilder<'static>, html: &str) -> Self {
        Self(sanitizer.clean(html).to_string())
    }

    /// Markup produced by a transformation that only inserts markup it built
    /// itself.
    pub(crate) fn from_rewrite(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
