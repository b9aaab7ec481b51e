//! Spectral peaks as stars over a slow particle backdrop.

use super::{FrameInput, Levels};
use crate::color::Rgb;
use crate::constants::*;
use crate::particles::{Bounds, ForceModel, Particle, ParticleSystem, SpawnPattern, StepParams};
use crate::surface::{Gradient, Painter};
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub bin: usize,
    pub magnitude: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub size: f32,
    pub color: Rgb,
}

pub type Peaks = SmallVec<[Peak; 32]>;

/// Minimum magnitude for a peak; rises with overall loudness.
pub fn peak_threshold(smoothed_overall: f32) -> f32 {
    let threshold = PEAK_THRESHOLD_BASE + smoothed_overall.max(0.0) * PEAK_THRESHOLD_VOLUME;
    threshold.min(PEAK_THRESHOLD_MAX)
}

/// Local maxima in the lower half of the snapshot.
///
/// A bin qualifies when it beats `threshold` and both neighbours and sits at
/// least [`PEAK_MIN_SPACING`] bins after the previous accepted peak.
pub fn pick_peaks(frequency: &[u8], threshold: f32) -> Peaks {
    let mut peaks = Peaks::new();
    let half = frequency.len() / 2;
    let mut last: Option<usize> = None;
    for i in 1..half {
        let v = frequency[i] as f32;
        if v <= threshold || v <= frequency[i - 1] as f32 || v <= frequency[i + 1] as f32 {
            continue;
        }
        if last.is_some_and(|l| i - l < PEAK_MIN_SPACING) {
            continue;
        }
        peaks.push(Peak { bin: i, magnitude: v });
        last = Some(i);
        if peaks.len() >= CONSTELLATION_MAX_STARS {
            break;
        }
    }
    peaks
}

/// Polar placement: bin index sets angle and radius, magnitude nudges outward.
pub fn star_position(peak: &Peak, half_bins: usize, bounds: &Bounds, time: f32) -> Vec2 {
    let frac = peak.bin as f32 / half_bins.max(1) as f32;
    let bin = peak.bin as f32;
    let angle = frac * TAU * 2.0 + (time * 0.6 + bin).sin() * 0.05;
    let spread = 0.15 + 0.85 * frac.sqrt();
    let swell = 0.85 + 0.15 * normalized(peak.magnitude);
    let radius = bounds.min_dim() * 0.45 * spread * swell + (time * 0.8 + bin * 0.3).sin() * 3.0;
    bounds.center() + Vec2::from_angle(angle) * radius
}

pub fn link_distance(levels: &Levels) -> f32 {
    60.0 + levels.mid * 120.0
}

/// Opacity of the link between two stars, fading linearly to zero at `max_dist`.
pub fn link_opacity(a: Vec2, b: Vec2, max_dist: f32) -> Option<f32> {
    let d = a.distance(b);
    (max_dist > 0.0 && d < max_dist).then(|| (1.0 - d / max_dist) * 0.5)
}

/// Gentle drift for the backdrop; particles leaving the view respawn anywhere.
pub struct DriftForce {
    pub levels: Levels,
}

impl ForceModel for DriftForce {
    fn params(&self) -> StepParams {
        StepParams {
            damping: CONSTELLATION_DAMPING,
            max_speed: 0.6,
            life_decay: CONSTELLATION_LIFE_DECAY_BASE + self.levels.overall * 0.2,
            spawn: SpawnPattern::Viewport,
        }
    }

    fn force(&self, _: usize, _: &Particle, _: &Bounds, rng: &mut StdRng) -> Vec2 {
        Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * 0.05
    }
}

pub fn render(painter: &mut Painter, input: &FrameInput, particles: &mut ParticleSystem) {
    let levels = input.levels();
    let palette = *input.palette();

    particles.step(&DriftForce { levels }, input.bounds, input.colors);
    for p in particles.particles() {
        painter.fill_circle(
            p.position.x,
            p.position.y,
            p.size * 0.6,
            p.color.rgba(0.15 * p.life_fraction()),
        );
    }

    let half_bins = input.frequency.len() / 2;
    let peaks = pick_peaks(input.frequency, peak_threshold(input.smoothed.overall));
    let stars: SmallVec<[Star; 32]> = peaks
        .iter()
        .enumerate()
        .map(|(i, peak)| Star {
            position: star_position(peak, half_bins, &input.bounds, input.time),
            size: 1.5 + normalized(peak.magnitude) * 4.0,
            color: palette.color(i),
        })
        .collect();

    let max_dist = link_distance(&levels);
    for (i, a) in stars.iter().enumerate() {
        for b in &stars[i + 1..] {
            if let Some(opacity) = link_opacity(a.position, b.position, max_dist) {
                painter.line(
                    (a.position.x, a.position.y),
                    (b.position.x, b.position.y),
                    0.8,
                    a.color.rgba(opacity),
                );
            }
        }
    }

    for star in &stars {
        let halo_r = star.size * 5.0;
        let halo = Gradient::radial(star.position.x, star.position.y, 0.0, halo_r)
            .stop(0.0, star.color.rgba(0.5))
            .stop(1.0, star.color.rgba(0.0));
        painter.fill_circle(star.position.x, star.position.y, halo_r, halo);
        painter.fill_circle(
            star.position.x,
            star.position.y,
            star.size,
            "rgba(255, 255, 255, 0.95)",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plateau_is_not_a_peak() {
        let mut data = vec![0u8; 64];
        data[10] = 200;
        data[11] = 200;
        assert!(pick_peaks(&data, 40.0).is_empty());
    }

    #[test]
    fn close_peaks_are_thinned() {
        let mut data = vec![0u8; 64];
        data[10] = 200;
        data[13] = 200;
        data[20] = 200;
        let bins: Vec<_> = pick_peaks(&data, 40.0).iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![10, 20]);
    }

    #[test]
    fn upper_half_is_ignored() {
        let mut data = vec![0u8; 64];
        data[40] = 250;
        assert!(pick_peaks(&data, 40.0).is_empty());
    }

    #[test]
    fn link_opacity_falls_off_linearly_and_symmetrically() {
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(130.0, 140.0);
        assert_eq!(link_opacity(a, b, 100.0), link_opacity(b, a, 100.0));
        let half = link_opacity(a, b, 100.0).unwrap();
        assert!((half - 0.25).abs() < 1e-6);
        assert_eq!(link_opacity(a, a, 100.0), Some(0.5));
        assert_eq!(link_opacity(a, b, 50.0), None);
        assert_eq!(link_opacity(a, b, 0.0), None);
    }

    #[test]
    fn threshold_tracks_volume() {
        assert_eq!(peak_threshold(0.0), PEAK_THRESHOLD_BASE);
        assert!(peak_threshold(100.0) > peak_threshold(10.0));
        assert_eq!(peak_threshold(255.0), PEAK_THRESHOLD_MAX);
    }
}
