use glam::Vec2;
use glyphfield_platform::SurfaceSize;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::compositor::{compose, DrawTarget};
use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::glyph::{GlyphRasterizer, GlyphSampler};
use crate::motion::{integrate, Clock, Repulsion};
use crate::particle::{build_particles, Particle};
use crate::pointer::PointerState;

/// All mutable state of one particle field: store, pointer, clock.
pub struct ParticleField<R> {
    config: FieldConfig,
    sampler: GlyphSampler<R>,
    particles: Vec<Particle>,
    pointer: PointerState,
    clock: Clock,
    surface: SurfaceSize,
    rng: Pcg32,
    builds: u64,
}

impl<R: GlyphRasterizer> ParticleField<R> {
    /// Creates an empty field; nothing is sampled until the first rebuild.
    /// Fails if `config` does not validate.
    pub fn new(config: FieldConfig, rasterizer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            sampler: GlyphSampler::new(rasterizer),
            particles: Vec::new(),
            pointer: PointerState::default(),
            clock: Clock::default(),
            surface: SurfaceSize::default(),
            rng,
            builds: 0,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Number of completed rebuilds.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Discards every particle and samples the current text again.
    pub fn rebuild(&mut self) {
        let coords = self
            .sampler
            .sample(&self.config.text, &self.config.font, self.surface);
        self.particles = build_particles(
            &coords,
            &self.config.palette,
            self.config.particle_radius,
            self.surface,
            &mut self.rng,
        );
        self.clock.reset();
        self.builds += 1;
        info!(
            "particle field rebuilt: {} particles for {:?} on {}",
            self.particles.len(),
            self.config.text,
            self.surface
        );
    }

    /// Rebuilds only when the size actually changed. Returns whether it did.
    pub fn resize(&mut self, surface: SurfaceSize) -> bool {
        if surface == self.surface && self.builds > 0 {
            return false;
        }
        debug!("surface resized {} -> {}", self.surface, surface);
        self.surface = surface;
        self.rebuild();
        true
    }

    /// Replaces the configuration and rebuilds. A new seed restarts the RNG.
    /// An invalid config is rejected and the current store is kept.
    pub fn set_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        self.replace_config(config)?;
        self.rebuild();
        Ok(())
    }

    /// Like `set_config`, but leaves the store alone until the next rebuild.
    pub fn replace_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.seed != self.config.seed {
            self.rng = seeded_rng(config.seed);
        }
        self.config = config;
        Ok(())
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer.moved(position);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    /// Advances every particle by one step.
    pub fn tick(&mut self) {
        let repulsion = Repulsion {
            radius: self.config.mouse_radius,
            strength: self.config.mouse_strength,
        };
        integrate(&mut self.particles, &self.pointer, &mut self.clock, repulsion);
    }

    pub fn render<T: DrawTarget + ?Sized>(&self, target: &mut T) {
        compose(target, &self.particles);
    }
}

fn seeded_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}
