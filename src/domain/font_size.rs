//! Structured CSS font size validated at the request boundary.
//!
//! The rendered form only ever contains digits, an optional decimal point and
//! one of a fixed set of unit tokens, so it can be interpolated into a style
//! sheet without further escaping.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::RequestError;

/// Ratio between the heading font size and the caption font size.
pub const CAPTION_RATIO: f64 = 0.375;

const MAX_FRACTION_DIGITS: usize = 2;
const MAX_WHOLE_DIGITS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontUnit {
    Px,
    Em,
    Rem,
    Pt,
    Vw,
    Vh,
    Percent,
}

impl FontUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            FontUnit::Px => "px",
            FontUnit::Em => "em",
            FontUnit::Rem => "rem",
            FontUnit::Pt => "pt",
            FontUnit::Vw => "vw",
            FontUnit::Vh => "vh",
            FontUnit::Percent => "%",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "" | "px" => Some(FontUnit::Px),
            "em" => Some(FontUnit::Em),
            "rem" => Some(FontUnit::Rem),
            "pt" => Some(FontUnit::Pt),
            "vw" => Some(FontUnit::Vw),
            "vh" => Some(FontUnit::Vh),
            "%" => Some(FontUnit::Percent),
            _ => None,
        }
    }
}

/// A positive CSS length used as the card's base font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontSize {
    magnitude: f64,
    unit: FontUnit,
}

impl FontSize {
    pub fn new(magnitude: f64, unit: FontUnit) -> Result<Self, RequestError> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(RequestError::invalid_font_size(
                magnitude.to_string(),
                "magnitude must be greater than zero",
            ));
        }
        Ok(Self { magnitude, unit })
    }

    pub fn px(magnitude: u32) -> Result<Self, RequestError> {
        Self::new(f64::from(magnitude), FontUnit::Px)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> FontUnit {
        self.unit
    }

    /// Caption size: the base magnitude scaled by [`CAPTION_RATIO`], same unit.
    pub fn caption(&self) -> Self {
        let scaled = self.magnitude * CAPTION_RATIO;
        Self {
            magnitude: (scaled * 10_000.0).round() / 10_000.0,
            unit: self.unit,
        }
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self {
            magnitude: 96.0,
            unit: FontUnit::Px,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.as_str())
    }
}

impl FromStr for FontSize {
    type Err = RequestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let split = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(value.len());
        let (number, unit) = value.split_at(split);

        let (whole, fraction) = match number.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (number, None),
        };

        if whole.is_empty() {
            return Err(RequestError::invalid_font_size(raw, "missing numeric value"));
        }
        if whole.len() > MAX_WHOLE_DIGITS {
            return Err(RequestError::invalid_font_size(
                raw,
                "at most five integer digits are supported",
            ));
        }
        if let Some(fraction) = fraction {
            if fraction.is_empty() || fraction.contains('.') {
                return Err(RequestError::invalid_font_size(raw, "malformed decimal value"));
            }
            if fraction.len() > MAX_FRACTION_DIGITS {
                return Err(RequestError::invalid_font_size(
                    raw,
                    "at most two fractional digits are supported",
                ));
            }
        }

        let unit = FontUnit::from_token(unit)
            .ok_or_else(|| RequestError::invalid_font_size(raw, "unsupported unit"))?;
        let magnitude: f64 = number
            .parse()
            .map_err(|_| RequestError::invalid_font_size(raw, "malformed numeric value"))?;

        Self::new(magnitude, unit).map_err(|_| {
            RequestError::invalid_font_size(raw, "magnitude must be a positive finite number")
        })
    }
}

impl TryFrom<String> for FontSize {
    type Error = RequestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> FontSize {
        raw.parse().expect("font size should parse")
    }

    #[test]
    fn parses_pixel_sizes() {
        let size = parse("40px");
        assert_eq!(size.magnitude(), 40.0);
        assert_eq!(size.unit(), FontUnit::Px);
        assert_eq!(size.to_string(), "40px");
    }

    #[test]
    fn bare_number_means_pixels() {
        assert_eq!(parse("72").to_string(), "72px");
        assert_eq!(parse("  72  ").to_string(), "72px");
    }

    #[test]
    fn accepts_relative_units_and_decimals() {
        assert_eq!(parse("2.5em").to_string(), "2.5em");
        assert_eq!(parse("8VW").to_string(), "8vw");
        assert_eq!(parse("150%").to_string(), "150%");
    }

    #[test]
    fn caption_is_three_eighths_of_base() {
        assert_eq!(parse("40px").caption().to_string(), "15px");
        assert_eq!(parse("96px").caption().to_string(), "36px");
        assert_eq!(parse("50px").caption().to_string(), "18.75px");
        assert_eq!(parse("2em").caption().to_string(), "0.75em");
    }

    #[test]
    fn rejects_values_without_digits() {
        for raw in ["", "px", "large", ".5em", "-4px"] {
            let err = raw.parse::<FontSize>().expect_err(raw);
            assert!(matches!(err, RequestError::InvalidFontSize { .. }), "{raw}");
        }
    }

    #[test]
    fn rejects_zero_and_trailing_garbage() {
        for raw in ["0", "0px", "0.00em", "40px;color:red", "40 px", "4.px", "1.2.3px", "1.234em"] {
            assert!(raw.parse::<FontSize>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn rejects_magnitudes_too_large_to_render() {
        let overflowing = format!("1{}px", "0".repeat(400));
        let err = overflowing.parse::<FontSize>().expect_err("overflow rejected");
        assert!(matches!(err, RequestError::InvalidFontSize { .. }));
        assert!("123456px".parse::<FontSize>().is_err());
        assert_eq!(parse("99999px").to_string(), "99999px");
    }

    #[test]
    fn default_matches_request_default() {
        assert_eq!(FontSize::default().to_string(), "96px");
    }

    #[test]
    fn json_values_are_validated() {
        let size: FontSize = serde_json::from_str("\"64px\"").expect("valid size");
        assert_eq!(size, FontSize::px(64).expect("positive"));
        assert!(serde_json::from_str::<FontSize>("\"64furlongs\"").is_err());
        assert_eq!(serde_json::to_string(&size).expect("serialize"), "\"64px\"");
    }
}
