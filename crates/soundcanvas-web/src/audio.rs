use soundcanvas_core::{SnapshotSource, VisualizerConfig};
use web_sys as web;

/// Build an analyser node configured from `config`.
///
/// The node is left unconnected; the page routes its own media source into it.
pub fn create_analyser(
    audio_ctx: &web::AudioContext,
    config: &VisualizerConfig,
) -> anyhow::Result<web::AnalyserNode> {
    let analyser = web::AnalyserNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
    analyser.set_fft_size(config.fft_size as u32);
    analyser.set_smoothing_time_constant(config.smoothing_time_constant as f64);
    log::info!(
        "[audio] analyser fft={} bins={} smoothing={}",
        config.fft_size,
        analyser.frequency_bin_count(),
        config.smoothing_time_constant
    );
    Ok(analyser)
}

/// Pulls byte snapshots out of a live analyser each frame.
pub struct AnalyserSource {
    analyser: web::AnalyserNode,
}

impl AnalyserSource {
    pub fn new(analyser: web::AnalyserNode) -> Self {
        Self { analyser }
    }
}

impl SnapshotSource for AnalyserSource {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn capture(&mut self, frequency: &mut [u8], time_domain: &mut [u8]) {
        self.analyser.get_byte_frequency_data(frequency);
        self.analyser.get_byte_time_domain_data(time_domain);
    }
}
