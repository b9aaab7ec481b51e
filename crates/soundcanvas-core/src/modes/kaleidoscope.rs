//! Eight mirrored segments sharing one arc-drawing routine.
//!
//! Only the transform changes between segments, which is what gives the
//! radial symmetry.

use super::FrameInput;
use crate::constants::*;
use crate::surface::{LineCap, Painter};

/// Bin driving arc `k`, spread across the lower third of the spectrum.
pub fn arc_bin(k: usize, bins: usize) -> usize {
    (k * bins / (KALEIDOSCOPE_ARCS * 3)).min(bins.saturating_sub(1))
}

fn draw_arcs(painter: &mut Painter, input: &FrameInput, segment: f32) {
    let levels = input.levels();
    let min_dim = input.bounds.min_dim();
    let t = input.time;
    let palette = input.palette();
    let bins = input.frequency.len();

    for k in 0..KALEIDOSCOPE_ARCS {
        let e = normalized(input.bin(arc_bin(k, bins)));
        let radius = min_dim * (0.04 + k as f32 * 0.035) + e * min_dim * 0.08;
        let span = segment * (0.25 + 0.6 * levels.mid);
        let drift = if k % 2 == 0 { 1.0 } else { -1.0 };
        let start = drift * t * (0.3 + k as f32 * 0.05) + levels.mid * 0.5;

        painter.set_stroke(palette.color(k).rgba(0.25 + e * 0.7));
        painter.set_line_width(1.0 + e * 5.0);
        painter.begin_path();
        painter.arc(0.0, 0.0, radius, start, start + span);
        painter.stroke();
    }
}

pub fn render(painter: &mut Painter, input: &FrameInput) {
    let center = input.center();
    let segment = segment_angle(KALEIDOSCOPE_SEGMENTS);
    painter.set_line_cap(LineCap::Round);
    for s in 0..KALEIDOSCOPE_SEGMENTS {
        painter.save();
        painter.translate(center.x, center.y);
        painter.rotate(s as f32 * segment + input.time * 0.05);
        if s % 2 == 1 {
            painter.scale(1.0, -1.0);
        }
        draw_arcs(painter, input, segment);
        painter.restore();
    }
}
