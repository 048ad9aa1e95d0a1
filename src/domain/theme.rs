//! Card themes and the palette/typography table they select from.

use serde::{Deserialize, Serialize};

/// Colour scheme of a rendered card.
///
/// Anything that is not exactly `dark` resolves to [`Theme::Light`]; callers
/// never see an "unknown theme" error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_param(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Theme::from_param(&value)
    }
}

/// Theme-dependent colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: String,
    /// Dot colour of the radial background pattern.
    pub radial: String,
    /// Heading gradient start and brand emphasis colour.
    pub primary: String,
    /// Heading gradient end colour.
    pub secondary: String,
    /// Percentage at which the heading gradient leaves `primary`.
    pub gradient_stop: u8,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            radial: "#E4E9F1".to_string(),
            primary: "#0169DF".to_string(),
            secondary: "#362EDC".to_string(),
            gradient_stop: 80,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#15283B".to_string(),
            radial: "#2D3B4E".to_string(),
            primary: "#FBB13C".to_string(),
            secondary: "#FF9A1F".to_string(),
            gradient_stop: 60,
        }
    }
}

/// Every literal constant a card embeds: palettes, typography and the fixed
/// attribution header. One design is loaded at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDesign {
    pub light: Palette,
    pub dark: Palette,
    /// Theme-independent gray for the brand label, separators and captions.
    pub neutral: String,
    pub font_family: String,
    /// Web-font stylesheets linked from the document head.
    pub font_stylesheets: Vec<String>,
    pub avatar_url: String,
    pub brand_label: String,
    pub brand_emphasis: String,
    /// Base URL of the hosted emoji glyphs; `svg/<id>.svg` is appended.
    pub emoji_base_url: String,
}

pub const DEFAULT_NEUTRAL: &str = "#7a8c97";
pub const DEFAULT_FONT_FAMILY: &str = "'Nunito', sans-serif";
pub const DEFAULT_AVATAR_URL: &str = "https://saharsh.tech/assets/images/saharsh.png";
pub const DEFAULT_BRAND_LABEL: &str = "@saharshy29 |";
pub const DEFAULT_BRAND_EMPHASIS: &str = "thoughts.";
pub const DEFAULT_EMOJI_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/";

impl Default for CardDesign {
    fn default() -> Self {
        Self {
            light: Palette::light(),
            dark: Palette::dark(),
            neutral: DEFAULT_NEUTRAL.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_stylesheets: Vec::new(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            brand_label: DEFAULT_BRAND_LABEL.to_string(),
            brand_emphasis: DEFAULT_BRAND_EMPHASIS.to_string(),
            emoji_base_url: DEFAULT_EMOJI_BASE_URL.to_string(),
        }
    }
}

impl CardDesign {
    pub fn palette(&self, theme: Theme) -> &Palette {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dark_selects_the_dark_theme() {
        assert_eq!(Theme::from_param("dark"), Theme::Dark);
        assert_eq!(Theme::from_param("light"), Theme::Light);
        assert_eq!(Theme::from_param("Dark"), Theme::Light);
        assert_eq!(Theme::from_param("solarized"), Theme::Light);
        assert_eq!(Theme::from_param(""), Theme::Light);
    }

    #[test]
    fn json_theme_falls_back_to_light() {
        let theme: Theme = serde_json::from_str("\"neon\"").expect("any string is accepted");
        assert_eq!(theme, Theme::Light);
        let theme: Theme = serde_json::from_str("\"dark\"").expect("dark is accepted");
        assert_eq!(theme, Theme::Dark);
    }

    #[test]
    fn palette_lookup_follows_theme() {
        let design = CardDesign::default();
        assert_eq!(design.palette(Theme::Dark).background, "#15283B");
        assert_eq!(design.palette(Theme::Light).background, "#FFFFFF");
        assert_eq!(design.palette(Theme::Light).gradient_stop, 80);
        assert_eq!(design.palette(Theme::Dark).gradient_stop, 60);
    }
}
