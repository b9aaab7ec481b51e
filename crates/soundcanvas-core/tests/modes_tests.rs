// Per-mode geometry helpers and whole-frame rendering against a recorder.

use glam::Vec2;
use rand::prelude::*;
use soundcanvas_core::features::BandEnergy;
use soundcanvas_core::modes::{self, constellation, flower, nebula, FrameInput};
use soundcanvas_core::surface::DrawCall;
use soundcanvas_core::{Bounds, ColorRegistry, DrawRecorder, Mode, Painter, ParticleSystem};

fn render_once(
    mode: Mode,
    bounds: Bounds,
    frequency: &[u8],
    time_domain: &[u8],
    level: f32,
) -> (DrawRecorder, usize) {
    let colors = ColorRegistry::new();
    let smoothed = BandEnergy {
        bass: level,
        mid: level,
        treble: level,
        overall: level,
    };
    let input = FrameInput {
        frequency,
        time_domain,
        smoothed,
        colors: &colors,
        time: 12.5,
        bounds,
        connection_stride: 5,
    };
    let mut particles = ParticleSystem::new(1);
    particles.reinitialize(150, bounds, &colors);
    let mut rng = StdRng::seed_from_u64(2);
    let mut recorder = DrawRecorder::new(bounds.width, bounds.height);
    let skipped = {
        let mut painter = Painter::new(&mut recorder);
        modes::render(mode, &mut painter, &input, &mut particles, &mut rng);
        painter.skipped()
    };
    (recorder, skipped)
}

#[test]
fn mode_names_round_trip_through_parse() {
    for mode in Mode::ALL {
        assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
        assert_eq!(mode.to_string(), mode.name());
    }
    assert_eq!("NEBULA".parse::<Mode>(), Ok(Mode::Nebula));
    assert!("disco".parse::<Mode>().is_err());
}

#[test]
fn every_mode_emits_only_finite_numbers() {
    let bounds = Bounds::new(800.0, 600.0);
    let loud = vec![255u8; 1024];
    let quiet = vec![0u8; 1024];
    let wave: Vec<u8> = (0..1024)
        .map(|i| (128.0 + 120.0 * (i as f32 * 0.1).sin()) as u8)
        .collect();
    for mode in Mode::ALL {
        for (freq, level) in [(&loud, 255.0), (&quiet, 0.0)] {
            let (recorder, _) = render_once(mode, bounds, freq, &wave, level);
            assert!(recorder.all_finite(), "{mode} produced non-finite draw call");
            if level > 0.0 {
                assert!(!recorder.calls.is_empty(), "{mode} drew nothing");
            }
        }
    }
}

#[test]
fn degenerate_viewport_never_reaches_the_surface_as_nan() {
    let bounds = Bounds::new(0.0, 0.0);
    let freq = vec![200u8; 1024];
    let time = vec![128u8; 1024];
    for mode in Mode::ALL {
        let (recorder, _) = render_once(mode, bounds, &freq, &time, 200.0);
        assert!(recorder.all_finite(), "{mode}");
    }
}

#[test]
fn kaleidoscope_balances_transform_stack() {
    let bounds = Bounds::new(800.0, 600.0);
    let freq = vec![90u8; 1024];
    let time = vec![128u8; 1024];
    let (recorder, _) = render_once(Mode::Kaleidoscope, bounds, &freq, &time, 90.0);
    let saves = recorder.count(|c| matches!(c, DrawCall::Save));
    let restores = recorder.count(|c| matches!(c, DrawCall::Restore));
    assert_eq!(saves, 8);
    assert_eq!(restores, 8);
    let mirrored =
        recorder.count(|c| matches!(c, DrawCall::Scale(x, y) if *x == 1.0 && *y == -1.0));
    assert_eq!(mirrored, 4);
    assert_eq!(recorder.count(|c| matches!(c, DrawCall::Arc(..))), 80);
}

#[test]
fn silent_spectrum_draws_no_bars() {
    let bounds = Bounds::new(800.0, 600.0);
    let (recorder, _) = render_once(Mode::Spectrum, bounds, &[0u8; 1024], &[128u8; 1024], 0.0);
    assert_eq!(recorder.count(|c| matches!(c, DrawCall::FillRect(..))), 0);
}

#[test]
fn waveform_traces_every_sample_twice() {
    let bounds = Bounds::new(800.0, 600.0);
    let time = vec![128u8; 1024];
    let (recorder, _) = render_once(Mode::Waveform, bounds, &[0u8; 1024], &time, 0.0);
    assert_eq!(recorder.count(|c| matches!(c, DrawCall::Stroke)), 2);
    assert_eq!(recorder.count(|c| matches!(c, DrawCall::MoveTo(..))), 2);
    assert_eq!(recorder.count(|c| matches!(c, DrawCall::LineTo(..))), 2 * 1023);
    let centred = recorder.calls.iter().all(|c| match c {
        DrawCall::LineTo(_, y) | DrawCall::MoveTo(_, y) => (*y - 300.0).abs() < 1e-3,
        _ => true,
    });
    assert!(centred);
}

#[test]
fn flower_stamens_need_smoothed_bass_above_100() {
    let bounds = Bounds::new(800.0, 600.0);
    let freq = vec![100u8; 1024];
    let time = vec![128u8; 1024];
    // only stamens are drawn as straight segments
    let (quiet, _) = render_once(Mode::Flower, bounds, &freq, &time, 99.0);
    assert_eq!(quiet.count(|c| matches!(c, DrawCall::LineTo(..))), 0);
    let (loud, _) = render_once(Mode::Flower, bounds, &freq, &time, 101.0);
    let petals = flower::petal_count(101.0);
    assert_eq!(petals, 11);
    assert_eq!(loud.count(|c| matches!(c, DrawCall::LineTo(..))), petals);
}

#[test]
fn single_peak_yields_one_star() {
    let mut freq = vec![0u8; 1024];
    freq[100] = 255;
    let peaks = constellation::pick_peaks(&freq, constellation::peak_threshold(0.0));
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].bin, 100);
    assert_eq!(peaks[0].magnitude, 255.0);
}

#[test]
fn peaks_are_spaced_and_capped() {
    let freq: Vec<u8> = (0..4096).map(|i| if i % 2 == 1 { 250 } else { 0 }).collect();
    let peaks = constellation::pick_peaks(&freq, 40.0);
    assert!(peaks.len() <= 64);
    assert!(peaks.windows(2).all(|w| w[1].bin - w[0].bin >= 5));
    assert!(peaks.iter().all(|p| p.bin < 2048));
}

#[test]
fn connection_opacity_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let a = Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        let b = Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        let max = rng.gen_range(1.0..300.0);
        assert_eq!(
            nebula::connection_opacity(a, b, max),
            nebula::connection_opacity(b, a, max)
        );
    }
}

#[test]
fn nebula_connections_respect_stride() {
    let pairs: Vec<_> = nebula::sampled_pairs(150, 5).collect();
    assert!(pairs.iter().all(|&(i, j)| i < j && j < 150 && j % 5 == 0));
    let dense: Vec<_> = nebula::sampled_pairs(150, 1).collect();
    assert_eq!(dense.len(), 150 * 149 / 2);
}
