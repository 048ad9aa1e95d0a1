//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{net::SocketAddr, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::theme::{CardDesign, Palette};

pub use cli::{CliArgs, Command, RenderArgs, RenderOverrides, ServeArgs, ServeOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "thoughtcard";
const ENV_PREFIX: &str = "THOUGHTCARD";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub sanitize_markdown: bool,
    pub design: CardDesign,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Render(args)) => raw.apply_render_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    render: RawRenderSettings,
    design: RawDesignSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }

        self.apply_render_overrides(&overrides.render);
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(sanitize) = overrides.sanitize_markdown {
            self.render.sanitize_markdown = Some(sanitize);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            render,
            design,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let render = RenderSettings {
            sanitize_markdown: render.sanitize_markdown.unwrap_or(false),
            design: build_design(design)?,
        };

        Ok(Self {
            server,
            logging,
            render,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_design(design: RawDesignSettings) -> Result<CardDesign, LoadError> {
    let defaults = CardDesign::default();

    let light = build_palette(design.light, defaults.light, PaletteKeys::LIGHT)?;
    let dark = build_palette(design.dark, defaults.dark, PaletteKeys::DARK)?;

    let neutral = color_or(design.neutral, defaults.neutral, "design.neutral")?;

    let font_family = design.font_family.unwrap_or(defaults.font_family);
    if font_family.trim().is_empty() {
        return Err(LoadError::invalid(
            "design.font_family",
            "must not be empty",
        ));
    }
    if font_family.contains(['{', '}', ';', '<', '>']) {
        return Err(LoadError::invalid(
            "design.font_family",
            "must be a plain font-family list",
        ));
    }

    let font_stylesheets = design
        .font_stylesheets
        .unwrap_or(defaults.font_stylesheets)
        .iter()
        .map(|value| http_url(value, "design.font_stylesheets"))
        .collect::<Result<Vec<_>, _>>()?;

    let avatar_url = match design.avatar_url {
        Some(value) => http_url(&value, "design.avatar_url")?,
        None => defaults.avatar_url,
    };

    let emoji_base_url = match design.emoji_base_url {
        Some(value) => {
            let url = http_url(&value, "design.emoji_base_url")?;
            if url.ends_with('/') {
                url
            } else {
                format!("{url}/")
            }
        }
        None => defaults.emoji_base_url,
    };

    Ok(CardDesign {
        light,
        dark,
        neutral,
        font_family,
        font_stylesheets,
        avatar_url,
        brand_label: design.brand_label.unwrap_or(defaults.brand_label),
        brand_emphasis: design.brand_emphasis.unwrap_or(defaults.brand_emphasis),
        emoji_base_url,
    })
}

struct PaletteKeys {
    background: &'static str,
    radial: &'static str,
    primary: &'static str,
    secondary: &'static str,
    gradient_stop: &'static str,
}

impl PaletteKeys {
    const LIGHT: Self = Self {
        background: "design.light.background",
        radial: "design.light.radial",
        primary: "design.light.primary",
        secondary: "design.light.secondary",
        gradient_stop: "design.light.gradient_stop",
    };

    const DARK: Self = Self {
        background: "design.dark.background",
        radial: "design.dark.radial",
        primary: "design.dark.primary",
        secondary: "design.dark.secondary",
        gradient_stop: "design.dark.gradient_stop",
    };
}

fn build_palette(
    raw: RawPaletteSettings,
    defaults: Palette,
    keys: PaletteKeys,
) -> Result<Palette, LoadError> {
    let gradient_stop = raw.gradient_stop.unwrap_or(defaults.gradient_stop);
    if gradient_stop > 100 {
        return Err(LoadError::invalid(
            keys.gradient_stop,
            "must be a percentage between 0 and 100",
        ));
    }

    Ok(Palette {
        background: color_or(raw.background, defaults.background, keys.background)?,
        radial: color_or(raw.radial, defaults.radial, keys.radial)?,
        primary: color_or(raw.primary, defaults.primary, keys.primary)?,
        secondary: color_or(raw.secondary, defaults.secondary, keys.secondary)?,
        gradient_stop,
    })
}

/// Colours are interpolated into the style sheet verbatim, so only `#rgb`,
/// `#rrggbb` and their alpha forms are accepted.
fn color_or(
    value: Option<String>,
    default: String,
    key: &'static str,
) -> Result<String, LoadError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let value = value.trim();
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| LoadError::invalid(key, format!("`{value}` is not a hex colour")))?;
    let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
    if !valid_len || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(LoadError::invalid(
            key,
            format!("`{value}` is not a hex colour"),
        ));
    }
    Ok(value.to_string())
}

fn http_url(value: &str, key: &'static str) -> Result<String, LoadError> {
    let url = Url::parse(value.trim())
        .map_err(|err| LoadError::invalid(key, format!("invalid url `{value}`: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(LoadError::invalid(
            key,
            format!("unsupported scheme `{scheme}`"),
        )),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    sanitize_markdown: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDesignSettings {
    light: RawPaletteSettings,
    dark: RawPaletteSettings,
    neutral: Option<String>,
    font_family: Option<String>,
    font_stylesheets: Option<Vec<String>>,
    avatar_url: Option<String>,
    brand_label: Option<String>,
    brand_emphasis: Option<String>,
    emoji_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPaletteSettings {
    background: Option<String>,
    radial: Option<String>,
    primary: Option<String>,
    secondary: Option<String>,
    gradient_stop: Option<u8>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}
