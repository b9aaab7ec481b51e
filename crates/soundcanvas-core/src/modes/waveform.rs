//! Oscilloscope trace of the time-domain snapshot with a lighter halo pass.

use super::FrameInput;
use crate::constants::{normalized, SILENCE_LEVEL};
use crate::surface::{Composite, LineCap, Painter};
use rand::rngs::StdRng;

/// Vertical pixel offset for time-domain sample `v`; silence sits on the centre line.
#[inline]
pub fn sample_offset(v: u8, half_height: f32) -> f32 {
    (v as f32 - SILENCE_LEVEL) / SILENCE_LEVEL * half_height * 0.8
}

fn trace(painter: &mut Painter, input: &FrameInput) {
    let samples = input.time_domain;
    let half = input.bounds.height * 0.5;
    let step = input.bounds.width / (samples.len().saturating_sub(1)).max(1) as f32;
    painter.begin_path();
    for (i, &v) in samples.iter().enumerate() {
        let x = i as f32 * step;
        let y = half + sample_offset(v, half);
        if i == 0 {
            painter.move_to(x, y);
        } else {
            painter.line_to(x, y);
        }
    }
    painter.stroke();
}

pub fn render(painter: &mut Painter, input: &FrameInput, rng: &mut StdRng) {
    if input.time_domain.is_empty() {
        return;
    }
    let width = 2.0 + normalized(input.smoothed.overall) * 6.0;
    painter.set_line_cap(LineCap::Round);

    painter.set_stroke(input.palette().color(0).to_hex());
    painter.set_line_width(width);
    trace(painter, input);

    painter.set_composite(Composite::Lighter);
    painter.set_stroke(input.colors.sample(rng, Some(0.2)));
    painter.set_line_width(width * 4.0);
    trace(painter, input);
    painter.set_composite(Composite::SourceOver);
}
