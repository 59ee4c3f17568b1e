//! Glyph sampling: text -> transient alpha mask -> grid of "ink" coordinates.

mod raster;

pub use self::raster::SwashRasterizer;

use glam::IVec2;
use glyphfield_platform::SurfaceSize;
use tracing::debug;

use crate::config::{ALPHA_THRESHOLD, SAMPLE_STEP};
use crate::font::FontDescriptor;

/// Single-channel coverage buffer the size of the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0; size.area()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Keeps the larger of the stored and incoming coverage. Out-of-bounds
    /// writes are dropped.
    pub fn accumulate(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = (y as u32 * self.width + x as u32) as usize;
        self.data[index] = self.data[index].max(alpha);
    }
}

/// Scans `mask` row by row on a `step` grid and returns every cell whose alpha
/// is strictly above `threshold`.
pub fn sample_mask(mask: &AlphaMask, step: u32, threshold: u8) -> Vec<IVec2> {
    let step = step.max(1) as usize;
    let mut points = Vec::new();
    for y in (0..mask.height).step_by(step) {
        for x in (0..mask.width).step_by(step) {
            if mask.get(x, y) > threshold {
                points.push(IVec2::new(x as i32, y as i32));
            }
        }
    }
    points
}

/// Renders text, centered on both axes, into an alpha mask of `size`.
///
/// Implementations must degrade to an empty (all zero) mask instead of
/// failing: missing fonts and empty text are not errors.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, text: &str, font: &FontDescriptor, size: SurfaceSize) -> AlphaMask;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn rasterize(&mut self, text: &str, font: &FontDescriptor, size: SurfaceSize) -> AlphaMask {
        (**self).rasterize(text, font, size)
    }
}

pub struct GlyphSampler<R> {
    rasterizer: R,
    step: u32,
    threshold: u8,
}

impl<R: GlyphRasterizer> GlyphSampler<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            step: SAMPLE_STEP,
            threshold: ALPHA_THRESHOLD,
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn sample(&mut self, text: &str, font: &FontDescriptor, size: SurfaceSize) -> Vec<IVec2> {
        if text.trim().is_empty() || size.is_empty() {
            return Vec::new();
        }
        let mask = self.rasterizer.rasterize(text, font, size);
        let points = sample_mask(&mask, self.step, self.threshold);
        debug!(
            "sampled {} glyph points from {:?} at {} (step {})",
            points.len(),
            text,
            size,
            self.step
        );
        points
    }
}
