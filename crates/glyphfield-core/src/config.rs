use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::font::FontDescriptor;

/// Grid stride, in pixels, used when scanning the rasterized glyphs.
pub const SAMPLE_STEP: u32 = 4;
/// Glyph pixels must have alpha strictly above this to become particles.
pub const ALPHA_THRESHOLD: u8 = 128;
/// Phase added to the shared clock once per tick.
pub const CLOCK_STEP: f64 = 0.02;
/// Amplitude of the ambient wobble around each particle's base position.
pub const WOBBLE_AMPLITUDE: f32 = 1.5;
/// A resting particle closes `1 / EASE_DIVISOR` of the gap to its target per tick.
pub const EASE_DIVISOR: f32 = 15.0;
/// Upper bound of the per-particle density factor.
pub const MAX_DENSITY: f32 = 30.0;

/// Construction-time configuration of one particle field. Changing any of it
/// rebuilds the particle store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub text: String,
    pub palette: Vec<Rgba>,
    pub particle_radius: f32,
    pub mouse_radius: f32,
    pub mouse_strength: f32,
    pub font: FontDescriptor,
    /// Fixed RNG seed; `None` draws one from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            text: "AIR 4.2".into(),
            palette: vec![
                Rgba::opaque(0x22, 0xd3, 0xee),
                Rgba::opaque(0xa8, 0x55, 0xf7),
                Rgba::opaque(0xf4, 0x72, 0xb6),
                Rgba::opaque(0xfa, 0xcc, 0x15),
            ],
            particle_radius: 2.0,
            mouse_radius: 60.0,
            mouse_strength: 20.0,
            font: FontDescriptor::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Loads a config file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        check("particle_radius", self.particle_radius, "a positive number", |v| v > 0.0)?;
        check("mouse_radius", self.mouse_radius, "a positive number", |v| v > 0.0)?;
        check("mouse_strength", self.mouse_strength, "a non-negative number", |v| v >= 0.0)?;
        Ok(())
    }
}

fn check(
    field: &'static str,
    value: f32,
    expected: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFamily;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = FieldConfig::from_toml_str(
            r##"
text = "HELLO"
palette = ["#fff", "#000000"]
mouse_strength = 0.0
font = "bold 64px Inter, sans-serif"
seed = 9
"##,
        )
        .unwrap();
        assert_eq!(config.text, "HELLO");
        assert_eq!(config.palette, vec![Rgba::opaque(255, 255, 255), Rgba::opaque(0, 0, 0)]);
        assert_eq!(config.mouse_radius, 60.0);
        assert_eq!(config.mouse_strength, 0.0);
        assert_eq!(config.font.size_px, 64.0);
        assert_eq!(config.font.families[1], FontFamily::SansSerif);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn json_round_trips() {
        let config = FieldConfig {
            seed: Some(3),
            ..FieldConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FieldConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            FieldConfig::from_toml_str("palette = []"),
            Err(ConfigError::EmptyPalette)
        ));
        assert!(matches!(
            FieldConfig::from_toml_str("mouse_radius = 0.0"),
            Err(ConfigError::OutOfRange { field: "mouse_radius", .. })
        ));
        assert!(matches!(
            FieldConfig::from_toml_str("mouse_strength = -1.0"),
            Err(ConfigError::OutOfRange { field: "mouse_strength", .. })
        ));
        assert!(matches!(
            FieldConfig::from_toml_str(r#"palette = ["red"]"#),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            FieldConfig::from_toml_str(r#"font = "Inter""#),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("field.toml");
        std::fs::write(&toml_path, "text = \"A\"\n").unwrap();
        assert_eq!(FieldConfig::load(&toml_path).unwrap().text, "A");

        let yaml_path = dir.path().join("field.yaml");
        std::fs::write(&yaml_path, "text: A\n").unwrap();
        assert!(matches!(
            FieldConfig::load(&yaml_path),
            Err(ConfigError::UnknownFormat(_))
        ));

        assert!(matches!(
            FieldConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
