//! Font descriptors in CSS shorthand form, e.g. `"italic bold 120px Inter, sans-serif"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FontParseError;

pub const WEIGHT_NORMAL: u16 = 400;
pub const WEIGHT_BOLD: u16 = 700;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Named(String),
    SansSerif,
    Serif,
    Monospace,
    Cursive,
    Fantasy,
}

impl FontFamily {
    fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if name.is_empty() {
            return None;
        }
        Some(match name.to_ascii_lowercase().as_str() {
            "sans-serif" => FontFamily::SansSerif,
            "serif" => FontFamily::Serif,
            "monospace" => FontFamily::Monospace,
            "cursive" => FontFamily::Cursive,
            "fantasy" => FontFamily::Fantasy,
            _ => FontFamily::Named(name.to_owned()),
        })
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Named(name) if name.contains(' ') => write!(f, "\"{name}\""),
            FontFamily::Named(name) => f.write_str(name),
            FontFamily::SansSerif => f.write_str("sans-serif"),
            FontFamily::Serif => f.write_str("serif"),
            FontFamily::Monospace => f.write_str("monospace"),
            FontFamily::Cursive => f.write_str("cursive"),
            FontFamily::Fantasy => f.write_str("fantasy"),
        }
    }
}

/// Parsed font style string. Families are in preference order and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontDescriptor {
    pub style: FontStyle,
    pub weight: u16,
    pub size_px: f32,
    pub families: Vec<FontFamily>,
}

impl FontDescriptor {
    pub fn new(size_px: f32, family: FontFamily) -> Self {
        Self {
            style: FontStyle::Normal,
            weight: WEIGHT_NORMAL,
            size_px,
            families: vec![family],
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        FontDescriptor::new(120.0, FontFamily::SansSerif).with_weight(WEIGHT_BOLD)
    }
}

impl FromStr for FontDescriptor {
    type Err = FontParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        if source.is_empty() {
            return Err(FontParseError::Empty);
        }

        let mut style = FontStyle::Normal;
        let mut weight = WEIGHT_NORMAL;
        let mut size_px = None;
        let mut rest = source;

        // Keywords precede the size; everything after the size token is the family list.
        while let Some(token) = rest.split_whitespace().next() {
            let after = rest[rest.find(token).unwrap_or(0) + token.len()..].trim_start();
            let lower = token.to_ascii_lowercase();
            match lower.as_str() {
                "normal" | "small-caps" => {}
                "italic" => style = FontStyle::Italic,
                "oblique" => style = FontStyle::Oblique,
                "bold" | "bolder" => weight = WEIGHT_BOLD,
                "lighter" => weight = 300,
                _ if lower.chars().all(|c| c.is_ascii_digit()) => {
                    let value: u16 = lower.parse().map_err(|_| FontParseError::BadWeight(u16::MAX))?;
                    if !(1..=1000).contains(&value) {
                        return Err(FontParseError::BadWeight(value));
                    }
                    weight = value;
                }
                _ => {
                    let size_token = lower.split('/').next().unwrap_or_default();
                    let Some(number) = size_token.strip_suffix("px") else {
                        return Err(FontParseError::MissingSize(source.to_owned()));
                    };
                    let value: f32 = number
                        .parse()
                        .map_err(|_| FontParseError::BadSize(token.to_owned()))?;
                    if !value.is_finite() || value <= 0.0 {
                        return Err(FontParseError::BadSize(token.to_owned()));
                    }
                    size_px = Some(value);
                    rest = after;
                    break;
                }
            }
            rest = after;
        }

        let size_px = size_px.ok_or_else(|| FontParseError::MissingSize(source.to_owned()))?;
        let families: Vec<FontFamily> = rest.split(',').filter_map(FontFamily::parse).collect();
        if families.is_empty() {
            return Err(FontParseError::MissingFamily(source.to_owned()));
        }

        Ok(FontDescriptor {
            style,
            weight,
            size_px,
            families,
        })
    }
}

impl TryFrom<String> for FontDescriptor {
    type Error = FontParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FontDescriptor> for String {
    fn from(font: FontDescriptor) -> Self {
        font.to_string()
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => f.write_str("italic ")?,
            FontStyle::Oblique => f.write_str("oblique ")?,
        }
        if self.weight != WEIGHT_NORMAL {
            write!(f, "{} ", self.weight)?;
        }
        write!(f, "{}px ", self.size_px)?;
        let families: Vec<String> = self.families.iter().map(ToString::to_string).collect();
        f.write_str(&families.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_css_shorthand() {
        let font: FontDescriptor = "italic bold 96px \"Fira Sans\", sans-serif".parse().unwrap();
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.weight, WEIGHT_BOLD);
        assert_eq!(font.size_px, 96.0);
        assert_eq!(
            font.families,
            vec![FontFamily::Named("Fira Sans".into()), FontFamily::SansSerif]
        );
    }

    #[test]
    fn numeric_weight_and_line_height() {
        let font: FontDescriptor = "800 48.5px/1.2 Inter".parse().unwrap();
        assert_eq!(font.weight, 800);
        assert_eq!(font.size_px, 48.5);
        assert_eq!(font.families, vec![FontFamily::Named("Inter".into())]);
    }

    #[test]
    fn rejects_incomplete_descriptors() {
        assert_eq!("".parse::<FontDescriptor>(), Err(FontParseError::Empty));
        assert!(matches!(
            "bold Inter".parse::<FontDescriptor>(),
            Err(FontParseError::MissingSize(_))
        ));
        assert!(matches!(
            "0px Inter".parse::<FontDescriptor>(),
            Err(FontParseError::BadSize(_))
        ));
        assert!(matches!(
            "bold 40px".parse::<FontDescriptor>(),
            Err(FontParseError::MissingFamily(_))
        ));
        assert_eq!(
            "1200 40px Inter".parse::<FontDescriptor>(),
            Err(FontParseError::BadWeight(1200))
        );
    }

    #[test]
    fn display_parses_back() {
        let font: FontDescriptor = "oblique 300 20px \"Noto Sans\", monospace".parse().unwrap();
        let again: FontDescriptor = font.to_string().parse().unwrap();
        assert_eq!(font, again);
    }
}
