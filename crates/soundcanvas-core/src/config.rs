use crate::color::ColorRegistry;
use crate::constants::{DEFAULT_CONNECTION_STRIDE, DEFAULT_PARTICLE_COUNT, MIN_BIN_COUNT};
use crate::error::{CoreError, CoreResult};
use crate::modes::Mode;

/// Session configuration, fixed before the first tick.
#[derive(Clone, Debug)]
pub struct VisualizerConfig {
    /// Analysis window; the snapshot carries `fft_size / 2` bins.
    pub fft_size: usize,
    /// Analyser smoothing, applied by the host when it builds the analyser.
    pub smoothing_time_constant: f32,
    pub particle_count: usize,
    /// Nebula only tests pairs whose second index is a multiple of this.
    pub connection_stride: usize,
    pub color_scheme: String,
    pub mode: Mode,
    pub seed: u64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
            particle_count: DEFAULT_PARTICLE_COUNT,
            connection_stride: DEFAULT_CONNECTION_STRIDE,
            color_scheme: "cosmic".to_string(),
            mode: Mode::Flower,
            seed: 42,
        }
    }
}

impl VisualizerConfig {
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(CoreError::InvalidConfig(format!(
                "fft_size {} must be a power of two in 32..=32768",
                self.fft_size
            )));
        }
        debug_assert!(self.bin_count() >= MIN_BIN_COUNT);
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(CoreError::InvalidConfig(format!(
                "smoothing_time_constant {} outside 0..=1",
                self.smoothing_time_constant
            )));
        }
        if self.particle_count == 0 {
            return Err(CoreError::InvalidConfig("particle_count must be at least 1".into()));
        }
        if self.connection_stride == 0 {
            return Err(CoreError::InvalidConfig(
                "connection_stride must be at least 1".into(),
            ));
        }
        ColorRegistry::new().palette(&self.color_scheme)?;
        Ok(())
    }
}
