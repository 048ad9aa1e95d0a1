mod config;
mod emoji;
mod markup;

use std::{sync::Arc, time::Instant};

use askama::Template;
use comrak::{Arena, format_html, parse_document};
use metrics::{counter, histogram};
use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::render::types::{RenderError, RenderService};
use crate::domain::{
    card::CardRequest,
    font_size::FontSize,
    theme::{CardDesign, Theme},
};
use crate::presentation::views::{CardDocumentTemplate, CardStylesheetTemplate};

pub use emoji::EmojiReplacer;
pub use markup::Markup;

use config::{build_markdown_sanitizer, default_options};

pub(crate) const METRIC_RENDER_TOTAL: &str = "thoughtcard_render_total";
pub(crate) const METRIC_RENDER_FAILED_TOTAL: &str = "thoughtcard_render_failed_total";
pub(crate) const METRIC_RENDER_MS: &str = "thoughtcard_render_ms";

/// Card pipeline: comrak for markdown headings, ammonia for escaping and
/// optional markdown sanitisation, askama for the style sheet and document.
pub struct CardRenderService {
    options: comrak::Options<'static>,
    markdown_sanitizer: Option<ammonia::Builder<'static>>,
    emoji: EmojiReplacer,
    design: CardDesign,
}

impl CardRenderService {
    pub fn new(config: RenderPipelineConfig) -> Self {
        let RenderPipelineConfig {
            sanitize_markdown,
            design,
        } = config;

        Self {
            options: default_options(),
            markdown_sanitizer: sanitize_markdown.then(build_markdown_sanitizer),
            emoji: EmojiReplacer::new(design.emoji_base_url.clone()),
            design,
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<CardRenderService>> =
    Lazy::new(|| Arc::new(CardRenderService::new(active_render_config())));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<CardRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for CardRenderService {
    fn default() -> Self {
        Self::new(RenderPipelineConfig::default())
    }
}

impl RenderService for CardRenderService {
    fn render(&self, request: &CardRequest) -> Result<String, RenderError> {
        let started_at = Instant::now();
        let result = self.render_document(request);

        match &result {
            Ok(html) => {
                counter!(METRIC_RENDER_TOTAL, "theme" => request.theme.as_str()).increment(1);
                debug!(
                    target = "application::render",
                    theme = request.theme.as_str(),
                    markdown = request.markdown,
                    images = request.images.len(),
                    caption = request.caption.is_some(),
                    bytes = html.len(),
                    "card rendered"
                );
            }
            Err(err) => {
                counter!(METRIC_RENDER_FAILED_TOTAL).increment(1);
                warn!(
                    target = "application::render",
                    theme = request.theme.as_str(),
                    markdown = request.markdown,
                    error = %err,
                    "card render failed"
                );
            }
        }
        histogram!(METRIC_RENDER_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        result
    }
}

impl CardRenderService {
    fn render_document(&self, request: &CardRequest) -> Result<String, RenderError> {
        let stylesheet = stylesheet_stage(&self.design, request.theme, &request.font_size)?;
        let images = images_stage(&request.images);
        let heading = self.heading_stage(&request.text, request.markdown)?;
        let caption = self.caption_stage(request.caption.as_deref());

        document_stage(&self.design, &stylesheet, &images, &heading, caption.as_ref())
    }

    /// Markdown headings are not escaped: they are trusted as rendered unless
    /// the sanitiser is configured.
    fn heading_stage(&self, text: &str, markdown: bool) -> Result<Markup, RenderError> {
        let markup = if markdown {
            let html = render_markdown_stage(text, &self.options)?;
            match &self.markdown_sanitizer {
                Some(sanitizer) => Markup::from_cleaned_html(sanitizer, &html),
                None => Markup::from_trusted_markdown(html),
            }
        } else {
            Markup::escape(text)
        };

        Ok(self.emoji.substitute(markup))
    }

    fn caption_stage(&self, caption: Option<&str>) -> Option<Markup> {
        caption.map(|caption| self.emoji.substitute(Markup::escape(caption)))
    }
}

fn render_markdown_stage(
    markdown: &str,
    options: &comrak::Options<'static>,
) -> Result<String, RenderError> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, options);

    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}

fn images_stage(images: &[String]) -> Vec<Markup> {
    images.iter().map(|image| Markup::escape(image)).collect()
}

fn stylesheet_stage(
    design: &CardDesign,
    theme: Theme,
    font_size: &FontSize,
) -> Result<String, RenderError> {
    let palette = design.palette(theme);
    let template = CardStylesheetTemplate {
        background: &palette.background,
        radial: &palette.radial,
        primary: &palette.primary,
        secondary: &palette.secondary,
        gradient_stop: palette.gradient_stop,
        neutral: &design.neutral,
        font_family: &design.font_family,
        font_size: font_size.to_string(),
        caption_size: font_size.caption().to_string(),
    };

    template.render().map_err(|err| RenderError::Template {
        template: "card/stylesheet.css",
        message: err.to_string(),
    })
}

fn document_stage(
    design: &CardDesign,
    stylesheet: &str,
    images: &[Markup],
    heading: &Markup,
    caption: Option<&Markup>,
) -> Result<String, RenderError> {
    let template = CardDocumentTemplate {
        stylesheet,
        font_stylesheets: &design.font_stylesheets,
        avatar_url: &design.avatar_url,
        brand_label: &design.brand_label,
        brand_emphasis: &design.brand_emphasis,
        images,
        heading,
        caption,
    };

    template.render().map_err(|err| RenderError::Template {
        template: "card/document.html",
        message: err.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct RenderPipelineConfig {
    pub sanitize_markdown: bool,
    pub design: CardDesign,
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            sanitize_markdown: settings.sanitize_markdown,
            design: settings.design.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}
