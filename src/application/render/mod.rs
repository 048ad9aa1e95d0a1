//! Card rendering pipeline.
//!
//! The pipeline is kept pure: it accepts a validated [`CardRequest`], produces
//! a deterministic HTML document, and surfaces structured errors. Parameter
//! parsing and HTTP concerns live with the caller.
//!
//! [`CardRequest`]: crate::domain::card::CardRequest

mod service;
mod types;

pub(crate) use service::{METRIC_RENDER_FAILED_TOTAL, METRIC_RENDER_MS, METRIC_RENDER_TOTAL};
pub use service::{
    CardRenderService, EmojiReplacer, Markup, RenderConfigError, RenderPipelineConfig,
    configure_render_service, render_service,
};
pub use types::{RenderError, RenderService};
