//! The seven render modes and the single point that dispatches between them.

use crate::color::{ColorRegistry, Palette};
use crate::constants::normalized;
use crate::error::CoreError;
use crate::features::BandEnergy;
use crate::particles::{Bounds, ParticleSystem};
use crate::surface::Painter;
use glam::Vec2;
use rand::rngs::StdRng;
use std::fmt;
use std::str::FromStr;

pub mod constellation;
pub mod flower;
pub mod kaleidoscope;
pub mod nebula;
pub mod orbital;
pub mod spectrum;
pub mod waveform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Flower,
    Orbital,
    Spectrum,
    Nebula,
    Waveform,
    Kaleidoscope,
    Constellation,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Flower,
        Mode::Orbital,
        Mode::Spectrum,
        Mode::Nebula,
        Mode::Waveform,
        Mode::Kaleidoscope,
        Mode::Constellation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Flower => "flower",
            Mode::Orbital => "orbital",
            Mode::Spectrum => "spectrum",
            Mode::Nebula => "nebula",
            Mode::Waveform => "waveform",
            Mode::Kaleidoscope => "kaleidoscope",
            Mode::Constellation => "constellation",
        }
    }

    /// Modes that expect a freshly spread, full-density particle field on entry.
    pub fn requires_fresh_particles(self) -> bool {
        matches!(self, Mode::Nebula | Mode::Constellation)
    }

    /// Modes whose particle field is rebuilt when the viewport changes shape.
    pub fn reseeds_on_resize(self) -> bool {
        matches!(self, Mode::Nebula | Mode::Constellation | Mode::Flower)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// Everything a mode reads for one frame.
pub struct FrameInput<'a> {
    pub frequency: &'a [u8],
    pub time_domain: &'a [u8],
    /// Recency-weighted band means.
    pub smoothed: BandEnergy,
    pub colors: &'a ColorRegistry,
    /// Seconds since the first tick.
    pub time: f32,
    pub bounds: Bounds,
    pub connection_stride: usize,
}

impl<'a> FrameInput<'a> {
    pub fn palette(&self) -> &Palette {
        self.colors.current()
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Magnitude of bin `index`, clamped into the snapshot.
    #[inline]
    pub fn bin(&self, index: usize) -> f32 {
        match self.frequency.len() {
            0 => 0.0,
            n => self.frequency[index.min(n - 1)] as f32,
        }
    }

    /// Normalized smoothed bands, each in [0, 1].
    pub fn levels(&self) -> Levels {
        Levels {
            bass: normalized(self.smoothed.bass),
            mid: normalized(self.smoothed.mid),
            treble: normalized(self.smoothed.treble),
            overall: normalized(self.smoothed.overall),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Levels {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub overall: f32,
}

/// Draw one frame of `mode` and advance the particles it drives.
pub fn render(
    mode: Mode,
    painter: &mut Painter,
    input: &FrameInput,
    particles: &mut ParticleSystem,
    rng: &mut StdRng,
) {
    match mode {
        Mode::Flower => flower::render(painter, input, particles),
        Mode::Orbital => orbital::render(painter, input, particles),
        Mode::Spectrum => spectrum::render(painter, input),
        Mode::Nebula => nebula::render(painter, input, particles),
        Mode::Waveform => waveform::render(painter, input, rng),
        Mode::Kaleidoscope => kaleidoscope::render(painter, input),
        Mode::Constellation => constellation::render(painter, input, particles),
    }
}

/// Closed Catmull-Rom loop through `points`, emitted as cubic segments.
pub(crate) fn closed_curve(painter: &mut Painter, points: &[Vec2]) {
    let n = points.len();
    if n < 3 {
        return;
    }
    let at = |i: isize| points[i.rem_euclid(n as isize) as usize];
    painter.move_to(points[0].x, points[0].y);
    for i in 0..n as isize {
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        painter.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p2.x, p2.y);
    }
    painter.close_path();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for m in Mode::ALL {
            assert_eq!(m.name().parse::<Mode>(), Ok(m));
            assert_eq!(m.to_string(), m.name());
        }
        assert_eq!(
            "disco".parse::<Mode>(),
            Err(CoreError::UnknownMode("disco".into()))
        );
    }
}
