//! Card requests and the parameter boundary that produces them.
//!
//! Raw parameters arrive as a URL path (`/<text>.<ext>`) plus a form-encoded
//! query string. Everything loosely typed about them is resolved here: theme
//! fallback, the markdown flag, the structured font size, repeated images and
//! the legacy `undefined` caption sentinel. Renderers only ever see a
//! [`CardRequest`].

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{error::RequestError, font_size::FontSize, theme::Theme};

/// Caption value older clients send when no caption was provided.
const LEGACY_ABSENT_CAPTION: &str = "undefined";

/// Input for a single card render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub text: String,
    #[serde(default)]
    pub theme: Theme,
    /// Treat `text` as markdown instead of literal content.
    #[serde(default)]
    pub markdown: bool,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl CardRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            theme: Theme::default(),
            markdown: false,
            font_size: FontSize::default(),
            images: Vec::new(),
            caption: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Raster format the screenshot step should produce. Not used by the
/// template itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn from_extension(extension: &str) -> Self {
        if extension == "jpeg" {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// A request decoded from a URL, together with the requested raster format.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCard {
    pub request: CardRequest,
    pub format: ImageFormat,
}

/// Decode `path` (already percent-decoded, leading `/` optional) and a raw
/// query string into a card request.
pub fn parse_card_query(path: &str, query: Option<&str>) -> Result<ParsedCard, RequestError> {
    let (text, format) = split_path(path);

    let mut theme: Option<String> = None;
    let mut font_size: Option<String> = None;
    let mut markdown: Option<String> = None;
    let mut caption: Option<String> = None;
    let mut images = Vec::new();

    let pairs = form_urlencoded::parse(query.unwrap_or_default().as_bytes());
    for (key, value) in pairs {
        match key.as_ref() {
            "theme" => set_once(&mut theme, "theme", value.into_owned())?,
            "fontSize" => set_once(&mut font_size, "fontSize", value.into_owned())?,
            "md" => set_once(&mut markdown, "md", value.into_owned())?,
            "caption" => set_once(&mut caption, "caption", value.into_owned())?,
            "images" => images.push(value.into_owned()),
            _ => {}
        }
    }

    let font_size = match font_size {
        Some(raw) => raw.parse()?,
        None => FontSize::default(),
    };

    let request = CardRequest {
        text,
        theme: theme.as_deref().map(Theme::from_param).unwrap_or_default(),
        markdown: matches!(markdown.as_deref(), Some("1" | "true")),
        font_size,
        images,
        caption: caption.filter(|value| value != LEGACY_ABSENT_CAPTION),
    };

    Ok(ParsedCard { request, format })
}

fn split_path(path: &str) -> (String, ImageFormat) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    match trimmed.rsplit_once('.') {
        Some((text, extension)) => (text.to_string(), ImageFormat::from_extension(extension)),
        None => (trimmed.to_string(), ImageFormat::default()),
    }
}

fn set_once(
    slot: &mut Option<String>,
    key: &'static str,
    value: String,
) -> Result<(), RequestError> {
    if slot.is_some() {
        return Err(RequestError::duplicate(key));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::font_size::FontUnit;

    fn parse(path: &str, query: &str) -> ParsedCard {
        parse_card_query(path, Some(query)).expect("query should parse")
    }

    #[test]
    fn defaults_apply_without_query() {
        let parsed = parse_card_query("/Hello.png", None).expect("parse");
        assert_eq!(parsed.format, ImageFormat::Png);
        assert_eq!(parsed.request, CardRequest::new("Hello"));
        assert_eq!(parsed.request.font_size.to_string(), "96px");
    }

    #[test]
    fn last_dot_separates_the_extension() {
        let parsed = parse("/v1.2 released.jpeg", "");
        assert_eq!(parsed.request.text, "v1.2 released");
        assert_eq!(parsed.format, ImageFormat::Jpeg);

        let parsed = parse("/no extension", "");
        assert_eq!(parsed.request.text, "no extension");
        assert_eq!(parsed.format, ImageFormat::Png);

        let parsed = parse("/Hello.gif", "");
        assert_eq!(parsed.format, ImageFormat::Png);
    }

    #[test]
    fn empty_path_yields_empty_text() {
        assert_eq!(parse("/", "").request.text, "");
        assert_eq!(parse("", "").request.text, "");
    }

    #[test]
    fn theme_falls_back_to_light() {
        assert_eq!(parse("/a.png", "theme=dark").request.theme, Theme::Dark);
        assert_eq!(parse("/a.png", "theme=sepia").request.theme, Theme::Light);
    }

    #[test]
    fn markdown_flag_accepts_one_and_true() {
        assert!(parse("/a.png", "md=1").request.markdown);
        assert!(parse("/a.png", "md=true").request.markdown);
        assert!(!parse("/a.png", "md=yes").request.markdown);
        assert!(!parse("/a.png", "md=0").request.markdown);
    }

    #[test]
    fn repeated_images_keep_their_order() {
        let parsed = parse(
            "/a.png",
            "images=https%3A%2F%2Fx.test%2Fa.svg&images=b.png&images=c.png",
        );
        assert_eq!(
            parsed.request.images,
            vec!["https://x.test/a.svg", "b.png", "c.png"]
        );
    }

    #[test]
    fn legacy_undefined_caption_means_absent() {
        assert_eq!(parse("/a.png", "caption=undefined").request.caption, None);
        assert_eq!(
            parse("/a.png", "caption=").request.caption,
            Some(String::new())
        );
        assert_eq!(
            parse("/a.png", "caption=Issue+%2342").request.caption.as_deref(),
            Some("Issue #42")
        );
    }

    #[test]
    fn font_size_is_structured() {
        let parsed = parse("/a.png", "fontSize=40px");
        assert_eq!(parsed.request.font_size.magnitude(), 40.0);
        assert_eq!(parsed.request.font_size.unit(), FontUnit::Px);
    }

    #[test]
    fn invalid_font_size_is_rejected() {
        let err = parse_card_query("/a.png", Some("fontSize=huge")).expect_err("invalid");
        assert!(matches!(err, RequestError::InvalidFontSize { .. }));
    }

    #[test]
    fn single_valued_parameters_reject_repeats() {
        for key in ["theme", "fontSize", "md", "caption"] {
            let query = format!("{key}=1&{key}=2");
            let err = parse_card_query("/a.png", Some(&query)).expect_err(key);
            assert_eq!(err, RequestError::DuplicateParameter { key });
        }
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let parsed = parse("/a.png", "widths=100&heights=200");
        assert_eq!(parsed.request, CardRequest::new("a"));
    }

    #[test]
    fn json_request_uses_defaults() {
        let request: CardRequest =
            serde_json::from_str(r#"{"text":"Hi","theme":"dark","fontSize":"48px"}"#)
                .expect("json request");
        assert_eq!(request.theme, Theme::Dark);
        assert_eq!(request.font_size.to_string(), "48px");
        assert!(!request.markdown);
        assert!(request.images.is_empty());
        assert_eq!(request.caption, None);
    }
}
