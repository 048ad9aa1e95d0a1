use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

use crate::domain::{
    card::CardRequest,
    font_size::FontSize,
    theme::Theme,
};

/// Command-line arguments for the thoughtcard binary.
#[derive(Debug, Parser)]
#[command(name = "thoughtcard", version, about = "Social preview card renderer")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "THOUGHTCARD_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the card HTTP service.
    Serve(Box<ServeArgs>),
    /// Render a single card document to stdout.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Run markdown headings through the HTML sanitiser.
    #[arg(
        long = "render-sanitize-markdown",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sanitize_markdown: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub render: RenderOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: RenderOverrides,

    /// Heading text.
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Card theme; anything other than `dark` renders light.
    #[arg(long, value_name = "THEME", default_value = "light")]
    pub theme: String,

    /// Treat the heading as markdown.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub markdown: bool,

    /// Heading font size, e.g. `96px` or `4.5rem`.
    #[arg(long = "font-size", value_name = "SIZE")]
    pub font_size: Option<FontSize>,

    /// Logo image URL; repeat for several logos.
    #[arg(long = "image", value_name = "URL")]
    pub images: Vec<String>,

    /// Caption shown below the heading.
    #[arg(long, value_name = "TEXT")]
    pub caption: Option<String>,
}

impl RenderArgs {
    pub fn to_request(&self) -> CardRequest {
        let mut request = CardRequest::new(self.text.clone())
            .with_theme(Theme::from_param(&self.theme))
            .with_markdown(self.markdown)
            .with_images(self.images.iter().cloned());
        if let Some(size) = self.font_size {
            request = request.with_font_size(size);
        }
        if let Some(caption) = self.caption.as_ref() {
            request = request.with_caption(caption.clone());
        }
        request
    }
}
