// End-to-end ticks through the visualizer with scripted snapshot sources.

use soundcanvas_core::constants::FLOWER_LIFE_DECAY_BASE;
use soundcanvas_core::surface::DrawCall;
use soundcanvas_core::{
    Bounds, CoreError, DrawRecorder, Mode, SnapshotSource, TickOutcome, Visualizer,
    VisualizerConfig,
};

struct Silence {
    bins: usize,
}

impl SnapshotSource for Silence {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn capture(&mut self, frequency: &mut [u8], time_domain: &mut [u8]) {
        frequency.fill(0);
        time_domain.fill(128);
    }
}

/// Sweeps a loud tone across the spectrum.
struct Sweep {
    bins: usize,
    frame: usize,
}

impl SnapshotSource for Sweep {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn capture(&mut self, frequency: &mut [u8], time_domain: &mut [u8]) {
        let peak = (self.frame * 7) % self.bins;
        for (i, v) in frequency.iter_mut().enumerate() {
            *v = 255u8.saturating_sub((i.abs_diff(peak) * 8).min(255) as u8);
        }
        for (i, v) in time_domain.iter_mut().enumerate() {
            *v = (128.0 + 100.0 * ((i + self.frame) as f32 * 0.05).sin()) as u8;
        }
        self.frame += 1;
    }
}

fn bounds() -> Bounds {
    Bounds::new(800.0, 600.0)
}

fn running(mode: Mode) -> Visualizer {
    let config = VisualizerConfig {
        mode,
        ..VisualizerConfig::default()
    };
    let mut vis = Visualizer::new(config, bounds()).unwrap();
    vis.resume();
    vis
}

#[test]
fn starts_stopped_with_default_particles() {
    let vis = Visualizer::new(VisualizerConfig::default(), bounds()).unwrap();
    assert!(!vis.is_running());
    assert!(!vis.should_reschedule());
    assert_eq!(vis.mode(), Mode::Flower);
    assert_eq!(vis.particles().len(), 150);
    assert_eq!(vis.colors().current().name, "cosmic");
}

#[test]
fn paused_visualizer_draws_nothing() {
    let mut vis = running(Mode::Flower);
    vis.pause();
    let mut surface = DrawRecorder::new(800.0, 600.0);
    let mut source = Silence { bins: 1024 };
    let outcome = vis.tick(&mut surface, &mut source, 0.0).unwrap();
    assert_eq!(outcome, TickOutcome::Paused);
    assert!(surface.calls.is_empty());
    assert!(!vis.should_reschedule());
}

#[test]
fn silent_spectrum_stays_flat_for_500_frames() {
    let mut vis = running(Mode::Spectrum);
    let mut surface = DrawRecorder::new(800.0, 600.0);
    let mut source = Silence { bins: 1024 };
    for frame in 0..500 {
        let outcome = vis
            .tick(&mut surface, &mut source, frame as f64 / 60.0)
            .unwrap();
        assert_eq!(outcome, TickOutcome::Rendered { skipped_draws: 0 });
    }
    // only the background fade each frame
    assert_eq!(surface.count(|c| matches!(c, DrawCall::FillRect(..))), 500);
    assert!(surface.all_finite());
    assert_eq!(vis.last_bands().overall, 0.0);
}

#[test]
fn silent_flower_decays_at_base_rate() {
    let mut vis = running(Mode::Flower);
    let mut surface = DrawRecorder::new(800.0, 600.0);
    let mut source = Silence { bins: 1024 };
    for frame in 0..50 {
        let before = vis.particles().particles().to_vec();
        vis.tick(&mut surface, &mut source, frame as f64 / 60.0).unwrap();
        for (prev, p) in before.iter().zip(vis.particles().particles()) {
            let decayed = (prev.life - FLOWER_LIFE_DECAY_BASE - p.life).abs() < 1e-3;
            let respawned = p.life == p.initial_life;
            assert!(decayed || respawned, "life {} -> {}", prev.life, p.life);
        }
    }
    assert!(surface.all_finite());
}

#[test]
fn switching_to_nebula_or_constellation_resets_to_150() {
    for mode in [Mode::Nebula, Mode::Constellation] {
        let mut vis = running(Mode::Flower);
        vis.reinitialize_particles(37);
        assert_eq!(vis.particles().len(), 37);
        vis.set_mode(mode);
        assert_eq!(vis.mode(), mode);
        assert_eq!(vis.particles().len(), 150);
    }
}

#[test]
fn switching_to_other_modes_keeps_the_arena() {
    let mut vis = running(Mode::Flower);
    vis.reinitialize_particles(37);
    vis.set_mode(Mode::Spectrum);
    assert_eq!(vis.particles().len(), 37);
}

#[test]
fn every_mode_survives_a_loud_sweep() {
    for mode in Mode::ALL {
        let mut vis = running(mode);
        let mut surface = DrawRecorder::new(800.0, 600.0);
        let mut source = Sweep { bins: 1024, frame: 0 };
        for frame in 0..120 {
            vis.tick(&mut surface, &mut source, frame as f64 / 60.0).unwrap();
        }
        assert!(surface.all_finite(), "{mode}");
        assert_eq!(vis.extractor().histories().overall.len(), 60);
        for p in vis.particles().particles() {
            assert!(p.life >= 0.0 && p.life <= p.initial_life);
        }
    }
}

#[test]
fn resize_reseeds_flower_but_not_spectrum() {
    let mut vis = running(Mode::Flower);
    vis.reinitialize_particles(10);
    vis.on_resize(Bounds::new(400.0, 300.0));
    assert_eq!(vis.particles().len(), 150);
    assert_eq!(vis.bounds(), Bounds::new(400.0, 300.0));

    let mut vis = running(Mode::Spectrum);
    vis.reinitialize_particles(10);
    vis.on_resize(Bounds::new(400.0, 300.0));
    assert_eq!(vis.particles().len(), 10);
}

#[test]
fn unknown_names_are_rejected_without_side_effects() {
    let mut vis = running(Mode::Orbital);
    assert_eq!(
        vis.set_mode_by_name("disco"),
        Err(CoreError::UnknownMode("disco".into()))
    );
    assert_eq!(vis.mode(), Mode::Orbital);
    assert!(vis.set_color_scheme("plaid").is_err());
    assert_eq!(vis.colors().current().name, "cosmic");
    vis.set_mode_by_name("waveform").unwrap();
    vis.set_color_scheme("neon").unwrap();
    assert_eq!(vis.mode(), Mode::Waveform);
    assert_eq!(vis.colors().current().name, "neon");
}

#[test]
fn mismatched_snapshots_are_reported() {
    let mut vis = running(Mode::Flower);
    let mut surface = DrawRecorder::new(800.0, 600.0);
    let mut source = Silence { bins: 512 };
    assert_eq!(
        vis.tick(&mut surface, &mut source, 0.0),
        Err(CoreError::SnapshotLength {
            expected: 1024,
            actual: 512
        })
    );
    assert_eq!(
        vis.render_snapshot(&mut surface, &[0; 1024], &[128; 10], 0.0),
        Err(CoreError::SnapshotLength {
            expected: 1024,
            actual: 10
        })
    );
    assert!(surface.calls.is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let config = VisualizerConfig {
        fft_size: 1000,
        ..VisualizerConfig::default()
    };
    assert!(matches!(
        Visualizer::new(config, bounds()),
        Err(CoreError::InvalidConfig(_))
    ));
    let config = VisualizerConfig {
        color_scheme: "plaid".into(),
        ..VisualizerConfig::default()
    };
    assert!(Visualizer::new(config, bounds()).is_err());
}

#[test]
fn pause_stops_rescheduling_until_resumed() {
    let mut vis = running(Mode::Nebula);
    let mut surface = DrawRecorder::new(800.0, 600.0);
    let mut source = Silence { bins: 1024 };
    assert!(vis.should_reschedule());
    vis.tick(&mut surface, &mut source, 0.0).unwrap();
    vis.pause();
    assert!(!vis.should_reschedule());
    let drawn = surface.calls.len();
    let life: Vec<_> = vis.particles().particles().iter().map(|p| p.life).collect();
    for frame in 1..10 {
        let outcome = vis.tick(&mut surface, &mut source, frame as f64).unwrap();
        assert_eq!(outcome, TickOutcome::Paused);
    }
    assert_eq!(surface.calls.len(), drawn);
    let after: Vec<_> = vis.particles().particles().iter().map(|p| p.life).collect();
    assert_eq!(life, after);
    vis.resume();
    assert!(vis.should_reschedule());
}
