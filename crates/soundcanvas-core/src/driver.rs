//! Frame driver: one snapshot in, one frame out, plus the command surface.
//!
//! All state lives in [`Visualizer`] and is only touched from the host's frame
//! callback or from the command methods, which the host calls between frames.

use crate::color::ColorRegistry;
use crate::config::VisualizerConfig;
use crate::constants::{BACKGROUND_FADE, SILENCE_LEVEL};
use crate::error::{CoreError, CoreResult};
use crate::features::{BandEnergy, FeatureExtractor};
use crate::modes::{self, FrameInput, Mode};
use crate::particles::{Bounds, ParticleSystem};
use crate::surface::{Painter, Surface};
use rand::prelude::*;

/// Host-side analyser feeding one frequency and one time-domain frame per tick.
pub trait SnapshotSource {
    fn bin_count(&self) -> usize;
    /// Overwrite both buffers (each `bin_count` long) with the latest frame.
    fn capture(&mut self, frequency: &mut [u8], time_domain: &mut [u8]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub frequency: Vec<u8>,
    pub time_domain: Vec<u8>,
}

impl Snapshot {
    pub fn silent(bins: usize) -> Self {
        Self {
            frequency: vec![0; bins],
            time_domain: vec![SILENCE_LEVEL as u8; bins],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered { skipped_draws: usize },
    Paused,
}

pub struct Visualizer {
    config: VisualizerConfig,
    extractor: FeatureExtractor,
    particles: ParticleSystem,
    colors: ColorRegistry,
    mode: Mode,
    bounds: Bounds,
    rng: StdRng,
    snapshot: Snapshot,
    last_bands: BandEnergy,
    started_at: Option<f64>,
    running: bool,
}

impl Visualizer {
    /// Build a stopped visualizer; call [`Visualizer::resume`] to start ticking.
    pub fn new(config: VisualizerConfig, bounds: Bounds) -> CoreResult<Self> {
        config.validate()?;
        let bins = config.bin_count();
        let mut colors = ColorRegistry::new();
        colors.set_current(&config.color_scheme)?;
        let mut particles = ParticleSystem::new(config.seed);
        particles.reinitialize(config.particle_count, bounds, &colors);
        let rng = StdRng::seed_from_u64(config.seed ^ 0x9E37_79B9_7F4A_7C15);
        log::info!(
            "[driver] bins={} mode={} scheme={}",
            bins,
            config.mode,
            config.color_scheme
        );
        Ok(Self {
            extractor: FeatureExtractor::new(bins),
            particles,
            colors,
            mode: config.mode,
            bounds,
            rng,
            snapshot: Snapshot::silent(bins),
            last_bands: BandEnergy::default(),
            started_at: None,
            running: false,
            config,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Band means from the most recent rendered tick.
    pub fn last_bands(&self) -> BandEnergy {
        self.last_bands
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the host should request another frame after this one.
    pub fn should_reschedule(&self) -> bool {
        self.running
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode.requires_fresh_particles() {
            self.reinitialize_particles(self.config.particle_count);
        }
        if mode != self.mode {
            log::info!("[mode] {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn set_mode_by_name(&mut self, name: &str) -> CoreResult<()> {
        let mode = name.parse::<Mode>().inspect_err(|e| log::warn!("[mode] {}", e))?;
        self.set_mode(mode);
        Ok(())
    }

    pub fn set_color_scheme(&mut self, name: &str) -> CoreResult<()> {
        self.colors
            .set_current(name)
            .inspect_err(|e| log::warn!("[palette] {}", e))
    }

    pub fn on_resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        if self.mode.reseeds_on_resize() {
            self.reinitialize_particles(self.config.particle_count);
        }
    }

    pub fn reinitialize_particles(&mut self, count: usize) {
        self.particles.reinitialize(count, self.bounds, &self.colors);
    }

    pub fn pause(&mut self) {
        if self.running {
            log::info!("[driver] paused");
        }
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.running {
            log::info!("[driver] resumed");
        }
        self.running = true;
    }

    /// Capture from `source` and render one frame at monotonic time `now` (seconds).
    pub fn tick(
        &mut self,
        surface: &mut dyn Surface,
        source: &mut dyn SnapshotSource,
        now: f64,
    ) -> CoreResult<TickOutcome> {
        if !self.running {
            return Ok(TickOutcome::Paused);
        }
        let expected = self.config.bin_count();
        let actual = source.bin_count();
        if actual != expected {
            return Err(CoreError::SnapshotLength { expected, actual });
        }
        let mut snapshot = std::mem::replace(&mut self.snapshot, Snapshot::silent(0));
        source.capture(&mut snapshot.frequency, &mut snapshot.time_domain);
        let outcome = self.render_frame(surface, &snapshot.frequency, &snapshot.time_domain, now);
        self.snapshot = snapshot;
        Ok(outcome)
    }

    /// Render one frame from caller-provided snapshots.
    pub fn render_snapshot(
        &mut self,
        surface: &mut dyn Surface,
        frequency: &[u8],
        time_domain: &[u8],
        now: f64,
    ) -> CoreResult<TickOutcome> {
        if !self.running {
            return Ok(TickOutcome::Paused);
        }
        let expected = self.config.bin_count();
        for actual in [frequency.len(), time_domain.len()] {
            if actual != expected {
                return Err(CoreError::SnapshotLength { expected, actual });
            }
        }
        Ok(self.render_frame(surface, frequency, time_domain, now))
    }

    fn render_frame(
        &mut self,
        surface: &mut dyn Surface,
        frequency: &[u8],
        time_domain: &[u8],
        now: f64,
    ) -> TickOutcome {
        let started = *self.started_at.get_or_insert(now);
        let time = (now - started).max(0.0) as f32;

        self.last_bands = self.extractor.extract(frequency);
        let smoothed = self.extractor.histories().smoothed();

        let mut painter = Painter::new(surface);
        painter.set_fill(BACKGROUND_FADE);
        painter.fill_rect(0.0, 0.0, self.bounds.width, self.bounds.height);

        let input = FrameInput {
            frequency,
            time_domain,
            smoothed,
            colors: &self.colors,
            time,
            bounds: self.bounds,
            connection_stride: self.config.connection_stride,
        };
        modes::render(
            self.mode,
            &mut painter,
            &input,
            &mut self.particles,
            &mut self.rng,
        );

        let skipped_draws = painter.skipped();
        if skipped_draws > 0 {
            log::debug!("[driver] skipped {} non-finite draw calls", skipped_draws);
        }
        TickOutcome::Rendered { skipped_draws }
    }
}
