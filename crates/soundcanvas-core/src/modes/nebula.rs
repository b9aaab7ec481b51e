//! Swirling particle cloud with sampled proximity links.

use super::{FrameInput, Levels};
use crate::constants::*;
use crate::particles::{
    direction, Bounds, ForceModel, Particle, ParticleSystem, SpawnPattern, StepParams,
};
use crate::surface::{Composite, Gradient, Painter};
use glam::Vec2;
use rand::prelude::*;

/// Radial bass push, phase-shifted tangential mid swirl, treble jitter.
pub struct NebulaForce {
    pub center: Vec2,
    pub levels: Levels,
    pub time: f32,
}

impl ForceModel for NebulaForce {
    fn params(&self) -> StepParams {
        StepParams {
            damping: NEBULA_DAMPING,
            max_speed: 2.0 + self.levels.overall * 4.0,
            life_decay: NEBULA_LIFE_DECAY_BASE + self.levels.overall * 0.8,
            spawn: SpawnPattern::CenterBurst,
        }
    }

    fn force(&self, _: usize, p: &Particle, _: &Bounds, rng: &mut StdRng) -> Vec2 {
        let Levels {
            bass, mid, treble, ..
        } = self.levels;
        let inward = direction(p.position, self.center);
        let dist = p.position.distance(self.center);

        let sign = if dist < NEBULA_CORE_RADIUS { 1.0 } else { -1.0 };
        let radial = inward * sign * bass * 0.4 * (dist / NEBULA_CORE_RADIUS);
        let swirl = inward.perp() * mid * 0.3 * (0.5 + 0.5 * (self.time * 1.5 + p.angle).sin());
        let jitter = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * treble * 0.6;
        radial + swirl + jitter
    }
}

pub fn connect_distance(levels: &Levels) -> f32 {
    NEBULA_CONNECT_BASE + levels.bass * 60.0 + levels.mid * 40.0
}

/// Line opacity for two points, fading linearly to zero at `max_dist`.
pub fn connection_opacity(a: Vec2, b: Vec2, max_dist: f32) -> Option<f32> {
    let d = a.distance(b);
    (max_dist > 0.0 && d < max_dist).then(|| (1.0 - d / max_dist) * 0.35)
}

/// Index pairs `(i, j)`, `i < j`, where `j` is a multiple of `stride`.
pub fn sampled_pairs(count: usize, stride: usize) -> impl Iterator<Item = (usize, usize)> {
    let stride = stride.max(1);
    (0..count).flat_map(move |i| {
        let first = (i / stride + 1) * stride;
        (first..count).step_by(stride).map(move |j| (i, j))
    })
}

pub fn render(painter: &mut Painter, input: &FrameInput, particles: &mut ParticleSystem) {
    let levels = input.levels();
    let force = NebulaForce {
        center: input.center(),
        levels,
        time: input.time,
    };
    particles.step(&force, input.bounds, input.colors);
    let field = particles.particles();

    painter.set_composite(Composite::Lighter);
    for p in field {
        let lf = p.life_fraction();
        let halo_r = p.size * 4.0 * (1.0 + levels.bass);
        let halo = Gradient::radial(p.position.x, p.position.y, 0.0, halo_r)
            .stop(0.0, p.color.rgba(0.35 * lf))
            .stop(1.0, p.color.rgba(0.0));
        painter.fill_circle(p.position.x, p.position.y, halo_r, halo);
    }
    painter.set_composite(Composite::SourceOver);
    for p in field {
        painter.fill_circle(
            p.position.x,
            p.position.y,
            p.size * 0.6,
            format!("rgba(255, 255, 255, {:.3})", 0.8 * p.life_fraction()),
        );
    }

    let max_dist = connect_distance(&levels);
    for (i, j) in sampled_pairs(field.len(), input.connection_stride) {
        let (a, b) = (&field[i], &field[j]);
        if let Some(opacity) = connection_opacity(a.position, b.position, max_dist) {
            painter.line(
                (a.position.x, a.position.y),
                (b.position.x, b.position.y),
                0.6,
                a.color.rgba(opacity),
            );
        }
    }
}
