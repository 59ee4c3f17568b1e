//! Frame composition: clear, then one filled circle per particle.

use std::path::Path;

use glam::Vec2;
use glyphfield_platform::SurfaceSize;

use crate::color::Rgba;
use crate::particle::Particle;

/// Anything particles can be drawn onto.
pub trait DrawTarget {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// Clears `target` and draws `particles` in store order.
pub fn compose<T: DrawTarget + ?Sized>(target: &mut T, particles: &[Particle]) {
    target.clear();
    for particle in particles {
        target.fill_circle(particle.position, particle.size, particle.color);
    }
}

/// Software RGBA8 surface, row-major, straight alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    size: SurfaceSize,
    background: Rgba,
    pixels: Vec<Rgba>,
}

impl PixelSurface {
    pub fn new(size: SurfaceSize, background: Rgba) -> Self {
        Self {
            size,
            background,
            pixels: vec![background; size.area()],
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Reallocates for a new size; contents are reset to the background.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.pixels = vec![self.background; size.area()];
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.pixels[(y * self.size.width + x) as usize])
    }

    pub fn as_rgba(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            self.as_rgba(),
            self.size.width,
            self.size.height,
            image::ColorType::Rgba8,
        )
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let index = (y * self.size.width + x) as usize;
        let dst = self.pixels[index];
        let src_a = color.a as u32;
        if src_a == 255 {
            self.pixels[index] = color;
            return;
        }
        let inv = 255 - src_a;
        let out_a = src_a + dst.a as u32 * inv / 255;
        if out_a == 0 {
            self.pixels[index] = Rgba::TRANSPARENT;
            return;
        }
        let channel = |s: u8, d: u8| {
            ((s as u32 * src_a + d as u32 * dst.a as u32 * inv / 255) / out_a) as u8
        };
        self.pixels[index] = Rgba::new(
            channel(color.r, dst.r),
            channel(color.g, dst.g),
            channel(color.b, dst.b),
            out_a as u8,
        );
    }
}

impl DrawTarget for PixelSurface {
    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Covers every pixel whose center lies inside the circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !center.is_finite() || radius.is_nan() || radius <= 0.0 || self.size.is_empty() {
            return;
        }
        let min = (center - Vec2::splat(radius)).floor().max(Vec2::ZERO);
        let max = (center + Vec2::splat(radius))
            .ceil()
            .min(Vec2::new(self.size.width as f32, self.size.height as f32));
        let radius_sq = radius * radius;
        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel_center.distance_squared(center) <= radius_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }
}
