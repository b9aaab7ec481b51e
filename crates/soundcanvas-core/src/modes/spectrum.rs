//! Mirrored 256-bar histogram around the horizontal centre line.

use super::FrameInput;
use crate::color::adjust_opacity;
use crate::constants::*;
use crate::surface::{Gradient, Painter};

/// Height of each bar, with bars spread evenly over the snapshot.
///
/// Each bar averages its bin with the next one and is capped at `half_height`.
pub fn bar_heights(
    frequency: &[u8],
    smoothed_overall: f32,
    half_height: f32,
) -> [f32; SPECTRUM_BARS] {
    let mut heights = [0.0; SPECTRUM_BARS];
    let n = frequency.len();
    if n == 0 {
        return heights;
    }
    let gain = half_height / MAX_MAGNITUDE * (0.8 + normalized(smoothed_overall) * 0.6);
    for (i, h) in heights.iter_mut().enumerate() {
        let idx = (i * n / SPECTRUM_BARS).min(n - 1);
        let next = (idx + 1).min(n - 1);
        let avg = (frequency[idx] as f32 + frequency[next] as f32) * 0.5;
        *h = (avg * gain).clamp(0.0, half_height.max(0.0));
    }
    heights
}

pub fn render(painter: &mut Painter, input: &FrameInput) {
    let width = input.bounds.width;
    let half = input.bounds.height * 0.5;
    let cy = half;
    let hex = input.palette().hex();
    let bar_w = width / SPECTRUM_BARS as f32;
    let fill_w = (bar_w - 1.0).max(1.0);

    let heights = bar_heights(input.frequency, input.smoothed.overall, half);
    for (i, &h) in heights.iter().enumerate() {
        if h <= 0.0 {
            continue;
        }
        let x = i as f32 * bar_w;
        let color = &hex[i * hex.len() / SPECTRUM_BARS];

        let up = Gradient::linear(x, cy - h, x, cy)
            .stop(0.0, adjust_opacity(color, 1.0))
            .stop(1.0, adjust_opacity(color, 0.3));
        painter.set_fill(up);
        painter.fill_rect(x, cy - h, fill_w, h);

        let down = Gradient::linear(x, cy, x, cy + h)
            .stop(0.0, adjust_opacity(color, 0.35))
            .stop(1.0, adjust_opacity(color, 0.0));
        painter.set_fill(down);
        painter.fill_rect(x, cy, fill_w, h);

        if h > half * SPECTRUM_CAP_FRACTION {
            painter.set_fill("rgba(255, 255, 255, 0.9)");
            painter.fill_rect(x, cy - h - 2.0, fill_w, 3.0);
        }
    }
}
