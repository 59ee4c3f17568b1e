use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use glyphfield_platform::SurfaceSize;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgba;
use crate::config::MAX_DENSITY;

/// One sampled glyph pixel. Only `position` changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub base_position: Vec2,
    pub size: f32,
    /// In (0, MAX_DENSITY]. Carried for force scaling; motion does not read it.
    pub density_factor: f32,
    pub color: Rgba,
    pub phase_x: f32,
    pub phase_y: f32,
}

/// Creates one particle per glyph coordinate, scattered uniformly over the
/// surface so the text materializes as they ease home.
///
/// Returns an empty store when `palette` is empty.
pub fn build_particles<R: Rng + ?Sized>(
    coords: &[IVec2],
    palette: &[Rgba],
    radius: f32,
    surface: SurfaceSize,
    rng: &mut R,
) -> Vec<Particle> {
    if palette.is_empty() {
        warn!("empty palette; no particles built");
        return Vec::new();
    }
    let extent = Vec2::new(surface.width as f32, surface.height as f32);
    coords
        .iter()
        .map(|coord| Particle {
            position: Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()) * extent,
            base_position: coord.as_vec2(),
            size: radius,
            density_factor: (1.0 - rng.gen::<f32>()) * MAX_DENSITY,
            color: palette[rng.gen_range(0..palette.len())],
            phase_x: rng.gen_range(0.0..TAU),
            phase_y: rng.gen_range(0.0..TAU),
        })
        .collect()
}
