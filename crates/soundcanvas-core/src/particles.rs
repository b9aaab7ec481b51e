//! Fixed-size particle arena with in-place respawn.
//!
//! The arena only changes size in [`ParticleSystem::reinitialize`]. Every other
//! path rewrites a slot where it stands, so an index names the same slot for
//! the whole lifetime of the arena and renderers can walk a fixed prefix.

use crate::color::{ColorRegistry, Rgb};
use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    /// True when `pos` lies inside the viewport grown by `margin` on every side.
    #[inline]
    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub origin: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub life: f32,
    pub initial_life: f32,
    /// Per-particle phase, also the start angle for orbit-style forces.
    pub angle: f32,
    pub orbit_radius: f32,
}

impl Particle {
    /// Remaining life in [0, 1].
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.initial_life > 0.0 {
            (self.life / self.initial_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Where a respawned particle reappears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPattern {
    /// Ring of radius 20..60 around the viewport centre, moving outward.
    CenterBurst,
    /// Anywhere in the viewport, slow random drift.
    Viewport,
}

/// Per-tick integration settings supplied by the active mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    /// Multiplicative velocity damping, 0.95..=0.98.
    pub damping: f32,
    pub max_speed: f32,
    /// Life lost this tick; baseline plus any audio boost.
    pub life_decay: f32,
    pub spawn: SpawnPattern,
}

/// Mode-specific force rule applied to each particle once per tick.
pub trait ForceModel {
    fn params(&self) -> StepParams;

    /// Acceleration for `particle` this tick. Non-finite results are ignored.
    fn force(&self, index: usize, particle: &Particle, bounds: &Bounds, rng: &mut StdRng) -> Vec2;
}

/// Unit vector from `from` towards `to`, zero when the points coincide.
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    if d.length() < DEGENERATE_DISTANCE {
        Vec2::ZERO
    } else {
        d.normalize_or_zero()
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// First `fraction` of the arena, used by lighter drawing passes.
    pub fn prefix(&self, fraction: f32) -> &[Particle] {
        let n = ((self.particles.len() as f32 * fraction.clamp(0.0, 1.0)) as usize)
            .min(self.particles.len());
        &self.particles[..n]
    }

    /// Drop every particle and build `count` fresh ones around the centre.
    pub fn reinitialize(&mut self, count: usize, bounds: Bounds, colors: &ColorRegistry) {
        let center = bounds.center();
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|id| {
                let jitter = Vec2::new(
                    (rng.gen::<f32>() - 0.5) * bounds.width * SPAWN_JITTER_FRACTION,
                    (rng.gen::<f32>() - 0.5) * bounds.height * SPAWN_JITTER_FRACTION,
                );
                let position = center + jitter;
                let life = rng.gen_range(LIFE_MIN..=LIFE_MAX);
                Particle {
                    id,
                    position,
                    velocity: Vec2::new(
                        rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED),
                        rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED),
                    ),
                    origin: position,
                    size: rng.gen_range(SIZE_MIN..=SIZE_MAX),
                    color: colors.sample_rgb(rng),
                    life,
                    initial_life: life,
                    angle: rng.gen_range(0.0..TAU),
                    orbit_radius: rng.gen_range(ORBIT_RADIUS_MIN..=ORBIT_RADIUS_MAX),
                }
            })
            .collect();
        log::info!(
            "[particles] reinitialized count={} bounds={:.0}x{:.0}",
            count,
            bounds.width,
            bounds.height
        );
    }

    /// Advance every particle by one tick under `model`.
    pub fn step<M: ForceModel + ?Sized>(
        &mut self,
        model: &M,
        bounds: Bounds,
        colors: &ColorRegistry,
    ) {
        let params = model.params();
        let damping = params.damping.clamp(0.0, 1.0);
        let decay = params.life_decay.max(0.0);
        let Self { particles, rng } = self;
        for (index, p) in particles.iter_mut().enumerate() {
            let mut force = model.force(index, p, &bounds, rng);
            if !force.is_finite() {
                force = Vec2::ZERO;
            }
            p.velocity = ((p.velocity + force) * damping).clamp_length_max(params.max_speed);
            if !p.velocity.is_finite() {
                p.velocity = Vec2::ZERO;
            }
            p.position += p.velocity;
            p.life = (p.life - decay).max(0.0);

            let expired = p.life <= 0.0;
            let escaped = !bounds.contains(p.position, p.size);
            if expired || escaped || rng.gen::<f32>() < RANDOM_RESPAWN_CHANCE {
                respawn(p, params.spawn, &bounds, colors, rng);
            }
        }
    }
}

fn respawn(
    p: &mut Particle,
    spawn: SpawnPattern,
    bounds: &Bounds,
    colors: &ColorRegistry,
    rng: &mut StdRng,
) {
    let center = bounds.center();
    match spawn {
        SpawnPattern::CenterBurst => {
            let theta = rng.gen_range(0.0..TAU);
            let dir = Vec2::from_angle(theta);
            p.position = center + dir * rng.gen_range(BURST_RADIUS_MIN..=BURST_RADIUS_MAX);
            p.velocity = dir * rng.gen_range(BURST_SPEED_MIN..=BURST_SPEED_MAX);
        }
        SpawnPattern::Viewport => {
            p.position = Vec2::new(
                rng.gen::<f32>() * bounds.width,
                rng.gen::<f32>() * bounds.height,
            );
            p.velocity = Vec2::new(
                rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED),
                rng.gen_range(-SPAWN_SPEED..=SPAWN_SPEED),
            );
        }
    }
    p.origin = p.position;
    p.size = rng.gen_range(SIZE_MIN..=SIZE_MAX);
    p.color = colors.sample_rgb(rng);
    p.life = rng.gen_range(LIFE_MIN..=LIFE_MAX);
    p.initial_life = p.life;
    p.angle = rng.gen_range(0.0..TAU);
    p.orbit_radius = rng.gen_range(ORBIT_RADIUS_MIN..=ORBIT_RADIUS_MAX);
}
