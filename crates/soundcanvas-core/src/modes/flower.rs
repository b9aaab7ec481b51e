//! Layered polar bloom whose petals follow the mid band.

use super::{closed_curve, FrameInput, Levels};
use crate::color::{adjust_opacity, PALETTE_SIZE};
use crate::constants::*;
use crate::particles::{
    direction, Bounds, ForceModel, Particle, ParticleSystem, SpawnPattern, StepParams,
};
use crate::surface::{Gradient, LineCap, Painter};
use glam::Vec2;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

pub fn petal_count(smoothed_mid: f32) -> usize {
    FLOWER_BASE_PETALS + (smoothed_mid.max(0.0) / FLOWER_MID_PER_PETAL).floor() as usize
}

/// Polar outline `r(angle, t)` of one bloom layer.
#[derive(Clone, Copy, Debug)]
pub struct PetalShape {
    pub base: f32,
    pub petals: usize,
    pub levels: Levels,
    pub time: f32,
}

impl PetalShape {
    pub fn radius(&self, angle: f32) -> f32 {
        let Levels {
            bass, mid, treble, ..
        } = self.levels;
        let n = self.petals as f32;
        let t = self.time;
        let base = self.base;

        let harmonic = base * (0.4 + 0.6 * mid) * (n * angle * 0.5).sin().abs();
        let secondary = base * 0.15 * mid * (2.0 * n * angle).sin();
        let bass_pulse = base * 0.3 * bass * (0.5 + 0.5 * (t * 4.0).sin());
        let slow_pulse = base * 0.05 * (t * 0.5).sin();
        let treble_detail = base * 0.08 * treble * (4.0 * n * angle + t * 6.0).sin();
        let asymmetry = base * 0.04 * (angle + t * 0.3).sin();

        (base + harmonic + secondary + bass_pulse + slow_pulse + treble_detail + asymmetry).max(0.0)
    }
}

/// Pulls particles toward the bloom, pushes them out once bass is hot.
pub struct BloomForce {
    pub center: Vec2,
    pub levels: Levels,
}

impl BloomForce {
    pub fn repels(&self) -> bool {
        self.levels.bass > FLOWER_REPEL_THRESHOLD
    }
}

impl ForceModel for BloomForce {
    fn params(&self) -> StepParams {
        StepParams {
            damping: FLOWER_DAMPING,
            max_speed: 2.0 + self.levels.bass * 4.0,
            life_decay: FLOWER_LIFE_DECAY_BASE + self.levels.overall * 0.7,
            spawn: SpawnPattern::CenterBurst,
        }
    }

    fn force(&self, _: usize, p: &Particle, _: &Bounds, _: &mut StdRng) -> Vec2 {
        let inward = direction(p.position, self.center);
        if self.repels() {
            -inward * (self.levels.bass * 0.6)
        } else {
            inward * (0.02 + self.levels.mid * 0.05)
        }
    }
}

pub fn render(painter: &mut Painter, input: &FrameInput, particles: &mut ParticleSystem) {
    let levels = input.levels();
    let center = input.center();
    let t = input.time;
    let palette = *input.palette();
    let hex = palette.hex();
    let shape = PetalShape {
        base: input.bounds.min_dim() * 0.12,
        petals: petal_count(input.smoothed.mid),
        levels,
        time: t,
    };
    let samples = shape.petals * FLOWER_SAMPLES_PER_PETAL;
    let cycle = (t * 0.5) as usize;

    let mut points = Vec::with_capacity(samples);
    for layer in 0..FLOWER_LAYERS {
        let scale = 1.0 - layer as f32 * 0.18;
        let alpha = 0.85 - layer as f32 * 0.18;
        let rotation = t * 0.05 + layer as f32 * 0.1;

        points.clear();
        let mut max_r = 0.0_f32;
        for k in 0..samples {
            let angle = k as f32 / samples as f32 * TAU;
            let r = shape.radius(angle) * scale;
            max_r = max_r.max(r);
            points.push(center + Vec2::from_angle(angle + rotation) * r);
        }

        let mut gradient = Gradient::radial(center.x, center.y, 0.0, max_r.max(1.0));
        for s in 0..PALETTE_SIZE {
            let color = &hex[(s + layer + cycle) % PALETTE_SIZE];
            gradient = gradient.stop(
                s as f32 / (PALETTE_SIZE - 1) as f32,
                adjust_opacity(color, alpha * (1.0 - s as f32 * 0.15)),
            );
        }
        painter.set_fill(gradient);
        painter.begin_path();
        closed_curve(painter, &points);
        painter.fill();
    }

    // glow core
    let core = shape.base * 0.3 * (1.0 + 0.3 * (t * 5.0).sin()) * (1.0 + levels.bass * 0.5);
    let glow = Gradient::radial(center.x, center.y, 0.0, core * 2.0)
        .stop(0.0, "rgba(255, 255, 255, 0.9)")
        .stop(0.4, adjust_opacity(&hex[0], 0.6))
        .stop(1.0, adjust_opacity(&hex[0], 0.0));
    painter.fill_circle(center.x, center.y, core * 2.0, glow);

    if input.smoothed.bass > FLOWER_STAMEN_BASS {
        let reach = shape.base * (0.5 + levels.bass * 0.5);
        painter.set_line_cap(LineCap::Round);
        for i in 0..shape.petals {
            let angle = i as f32 / shape.petals as f32 * TAU + t * 0.2;
            let tip = center + Vec2::from_angle(angle) * reach;
            let color = palette.color(i + 3);
            painter.line((center.x, center.y), (tip.x, tip.y), 1.5, color.rgba(0.7));
            painter.fill_circle(tip.x, tip.y, 2.5, color.to_hex());
        }
    }

    let force = BloomForce { center, levels };
    particles.step(&force, input.bounds, input.colors);
    draw_motes(painter, particles.particles());
}

fn draw_motes(painter: &mut Painter, particles: &[Particle]) {
    for p in particles {
        painter.fill_circle(
            p.position.x,
            p.position.y,
            p.size,
            p.color.rgba(p.life_fraction() * 0.8),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn petals_grow_with_mid() {
        assert_eq!(petal_count(0.0), 7);
        assert_eq!(petal_count(24.9), 7);
        assert_eq!(petal_count(25.0), 8);
        assert_eq!(petal_count(255.0), 17);
    }

    fn particle_at(position: Vec2) -> Particle {
        Particle {
            id: 0,
            position,
            velocity: Vec2::ZERO,
            origin: position,
            size: 2.0,
            color: Default::default(),
            life: 100.0,
            initial_life: 100.0,
            angle: 0.0,
            orbit_radius: 80.0,
        }
    }

    #[test]
    fn bloom_switches_from_attract_to_repel_above_threshold() {
        let center = Vec2::new(400.0, 300.0);
        let p = particle_at(Vec2::new(500.0, 300.0));
        let bounds = Bounds::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(1);
        let calm = BloomForce {
            center,
            levels: Levels {
                bass: 0.69,
                ..Levels::default()
            },
        };
        let loud = BloomForce {
            center,
            levels: Levels {
                bass: 0.71,
                ..Levels::default()
            },
        };
        assert!(!calm.repels());
        assert!(loud.repels());
        // particle sits to the right of the centre
        assert!(calm.force(0, &p, &bounds, &mut rng).x < 0.0);
        assert!(loud.force(0, &p, &bounds, &mut rng).x > 0.0);
    }

    #[test]
    fn bloom_has_no_force_at_the_centre() {
        let center = Vec2::new(400.0, 300.0);
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Bounds::new(800.0, 600.0);
        for bass in [0.0, 1.0] {
            let force = BloomForce {
                center,
                levels: Levels {
                    bass,
                    ..Levels::default()
                },
            };
            assert_eq!(force.force(0, &particle_at(center), &bounds, &mut rng), Vec2::ZERO);
        }
    }

    #[test]
    fn radius_stays_non_negative() {
        let shape = PetalShape {
            base: 50.0,
            petals: 9,
            levels: Levels::default(),
            time: 3.0,
        };
        for k in 0..360 {
            assert!(shape.radius(k as f32 / 360.0 * TAU) >= 0.0);
        }
    }
}
