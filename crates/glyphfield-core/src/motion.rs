//! Per-tick integration: pointer repulsion, otherwise easing back toward a
//! wobbling target around the base position.

use glam::Vec2;

use crate::config::{CLOCK_STEP, EASE_DIVISOR, WOBBLE_AMPLITUDE};
use crate::particle::Particle;
use crate::pointer::PointerState;

/// Shared ambient phase. One step per tick, reset on rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    phase: f64,
}

impl Clock {
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn advance(&mut self) {
        self.phase += CLOCK_STEP;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    pub radius: f32,
    pub strength: f32,
}

/// Resting point of `particle` at clock `phase`.
pub fn ambient_target(particle: &Particle, phase: f64) -> Vec2 {
    let wobble = Vec2::new(
        (phase + particle.phase_x as f64).sin() as f32,
        (phase + particle.phase_y as f64).cos() as f32,
    );
    particle.base_position + wobble * WOBBLE_AMPLITUDE
}

/// Advances one particle by one tick.
pub fn step_particle(particle: &mut Particle, pointer: &PointerState, phase: f64, repulsion: Repulsion) {
    let delta = pointer.position - particle.position;
    let distance = delta.length();

    if pointer.active && distance < repulsion.radius {
        // Pointer exactly on the particle: no direction to push in.
        if distance < f32::EPSILON {
            return;
        }
        let force = (repulsion.radius - distance) / repulsion.radius;
        particle.position -= delta / distance * force * repulsion.strength;
    } else {
        let target = ambient_target(particle, phase);
        particle.position -= (particle.position - target) / EASE_DIVISOR;
    }
}

/// Steps every particle at the current phase, then advances the clock once.
pub fn integrate(particles: &mut [Particle], pointer: &PointerState, clock: &mut Clock, repulsion: Repulsion) {
    let phase = clock.phase();
    for particle in particles.iter_mut() {
        step_particle(particle, pointer, phase, repulsion);
    }
    clock.advance();
}
