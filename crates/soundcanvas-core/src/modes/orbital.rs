//! Central star, five rings of planets, and moons for the heavier planets.

use super::{FrameInput, Levels};
use crate::constants::*;
use crate::particles::{
    direction, Bounds, ForceModel, Particle, ParticleSystem, SpawnPattern, StepParams,
};
use crate::surface::{Gradient, Painter};
use glam::Vec2;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

/// Bin sampled for `ring`, spread over the lower quarter of the spectrum.
pub fn ring_bin(ring: usize, bins: usize) -> usize {
    ((ring + 1) * bins / (ORBITAL_RINGS * 4)).min(bins.saturating_sub(1))
}

/// Angular speed in radians per second; odd rings run backwards.
pub fn ring_speed(ring: usize) -> f32 {
    let speed = 0.6 / (ring as f32 + 1.0);
    if ring % 2 == 1 {
        -speed
    } else {
        speed
    }
}

pub fn planet_size(energy: f32) -> f32 {
    3.0 + normalized(energy) * 12.0
}

pub fn moon_count(size: f32) -> usize {
    if size > ORBITAL_MOON_SIZE {
        (size / 4.0).floor() as usize
    } else {
        0
    }
}

/// Keeps dust circling the star at each particle's own orbit radius.
pub struct OrbitForce {
    pub center: Vec2,
    pub levels: Levels,
}

impl ForceModel for OrbitForce {
    fn params(&self) -> StepParams {
        StepParams {
            damping: ORBITAL_DAMPING,
            max_speed: 1.5 + self.levels.overall * 2.0,
            life_decay: ORBITAL_LIFE_DECAY_BASE + self.levels.overall * 0.5,
            spawn: SpawnPattern::Viewport,
        }
    }

    fn force(&self, _: usize, p: &Particle, _: &Bounds, _: &mut StdRng) -> Vec2 {
        let outward = direction(self.center, p.position);
        let dist = p.position.distance(self.center);
        let radial = -outward * (dist - p.orbit_radius) * 0.002;
        let tangential = outward.perp() * (0.05 + self.levels.mid * 0.1);
        radial + tangential
    }
}

pub fn render(painter: &mut Painter, input: &FrameInput, particles: &mut ParticleSystem) {
    let levels = input.levels();
    let center = input.center();
    let t = input.time;
    let palette = *input.palette();
    let min_dim = input.bounds.min_dim();
    let bins = input.frequency.len();

    particles.step(&OrbitForce { center, levels }, input.bounds, input.colors);
    for p in particles.prefix(0.5) {
        painter.fill_circle(
            p.position.x,
            p.position.y,
            p.size * 0.5,
            p.color.rgba(p.life_fraction() * 0.3),
        );
    }

    let star = min_dim * 0.05 * (1.0 + levels.bass * 1.5);
    let glow = Gradient::radial(center.x, center.y, star * 0.5, star * 3.0)
        .stop(0.0, palette.color(3).rgba(0.4 + levels.bass * 0.5))
        .stop(1.0, palette.color(3).rgba(0.0));
    painter.fill_circle(center.x, center.y, star * 3.0, glow);
    painter.fill_circle(center.x, center.y, star, "rgba(255, 255, 240, 0.95)");

    for ring in 0..ORBITAL_RINGS {
        let energy = input.bin(ring_bin(ring, bins));
        let e = normalized(energy);
        let wobble = 1.0 + 0.03 * (t * 0.5 + ring as f32).sin();
        let radius = min_dim * (0.12 + ring as f32 * 0.07) * wobble;
        let color = palette.color(ring);

        painter.set_stroke(color.rgba(0.15 + e * 0.6));
        painter.set_line_width(1.0 + e * 4.0);
        painter.begin_path();
        painter.arc(center.x, center.y, radius, 0.0, TAU);
        painter.stroke();

        let planets = 2 + ring;
        let size = planet_size(energy);
        for j in 0..planets {
            let angle = t * ring_speed(ring) + j as f32 / planets as f32 * TAU;
            let pos = center + Vec2::from_angle(angle) * radius;
            let body = Gradient::radial(pos.x, pos.y, 0.0, size)
                .stop(0.0, "rgba(255, 255, 255, 0.95)")
                .stop(0.5, color.rgba(0.9))
                .stop(1.0, color.rgba(0.0));
            painter.fill_circle(pos.x, pos.y, size, body);

            let moons = moon_count(size);
            for k in 0..moons {
                let moon_angle = t * 2.0 + k as f32 / moons as f32 * TAU;
                let moon = pos + Vec2::from_angle(moon_angle) * size * 1.8;
                painter.fill_circle(moon.x, moon.y, 1.5, palette.color(ring + 2).rgba(0.8));
            }
        }
    }
}
