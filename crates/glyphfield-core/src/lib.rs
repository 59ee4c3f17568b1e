//! Glyphfield core engine: environment-agnostic logic for sampling text into
//! particles, moving them each frame, and drawing them.

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod field;
pub mod font;
pub mod glyph;
pub mod motion;
pub mod particle;
pub mod pointer;
pub mod runtime;

pub use color::Rgba;
pub use compositor::{compose, DrawTarget, PixelSurface};
pub use config::FieldConfig;
pub use error::{ColorParseError, ConfigError, FontParseError, RuntimeError};
pub use field::ParticleField;
pub use font::{FontDescriptor, FontFamily, FontStyle};
pub use glyph::{AlphaMask, GlyphRasterizer, GlyphSampler, SwashRasterizer};
pub use motion::{Clock, Repulsion};
pub use particle::Particle;
pub use pointer::PointerState;
pub use runtime::{FieldRuntime, Lifecycle};
