use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color `{0}` must start with `#`")]
    MissingHash(String),
    #[error("color `{0}` must have 3, 4, 6 or 8 hex digits")]
    BadLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    BadDigit(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum FontParseError {
    #[error("font descriptor is empty")]
    Empty,
    #[error("font descriptor `{0}` has no `<n>px` size")]
    MissingSize(String),
    #[error("font size `{0}` is not a positive number of pixels")]
    BadSize(String),
    #[error("font weight {0} is outside 1..=1000")]
    BadWeight(u16),
    #[error("font descriptor `{0}` names no family")]
    MissingFamily(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension for {0} (expected .toml or .json)")]
    UnknownFormat(PathBuf),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("particle field has been torn down")]
    TornDown,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("host error: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}
