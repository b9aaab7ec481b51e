//! Banded spectral energy and its recency-weighted rolling history.

use crate::constants::{
    BASS_END_FRACTION, HISTORY_LEN, MID_END_FRACTION, MIN_BIN_COUNT, TREBLE_END_FRACTION,
};
use std::ops::Range;

/// Mean magnitude per band for one snapshot. Every field is in [0, 255].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergy {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub overall: f32,
}

/// Contiguous bin ranges for each band, derived once from the bin count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandRanges {
    pub bins: usize,
    pub bass: Range<usize>,
    pub mid: Range<usize>,
    pub treble: Range<usize>,
}

impl BandRanges {
    /// Split `bins` so that `0 <= bass_end < mid_end < treble_end <= bins`.
    ///
    /// Bin 0 (DC) is left out of the bass band.
    pub fn for_bins(bins: usize) -> Self {
        let bins = bins.max(MIN_BIN_COUNT);
        let frac = |f: f32| (bins as f32 * f) as usize;
        let bass_end = frac(BASS_END_FRACTION).max(2);
        let mid_end = frac(MID_END_FRACTION).max(bass_end + 1);
        let treble_end = frac(TREBLE_END_FRACTION).max(mid_end + 1).min(bins);
        Self {
            bins,
            bass: 1..bass_end,
            mid: bass_end..mid_end,
            treble: mid_end..treble_end,
        }
    }
}

/// Fixed 60-slot FIFO of band energies. Always full; starts at zero.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    values: [f32; HISTORY_LEN],
    oldest: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self {
            values: [0.0; HISTORY_LEN],
            oldest: 0,
        }
    }
}

impl HistoryBuffer {
    /// Append `value`, evicting the oldest sample.
    pub fn push(&mut self, value: f32) {
        self.values[self.oldest] = value;
        self.oldest = (self.oldest + 1) % HISTORY_LEN;
    }

    pub fn len(&self) -> usize {
        HISTORY_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn latest(&self) -> f32 {
        self.values[(self.oldest + HISTORY_LEN - 1) % HISTORY_LEN]
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..HISTORY_LEN).map(move |i| self.values[(self.oldest + i) % HISTORY_LEN])
    }

    /// Linearly weighted average; sample `i` (0 = oldest) weighs `(i + 1) / 60`.
    pub fn smoothed(&self) -> f32 {
        let len = HISTORY_LEN as f32;
        let (sum, weights) = self
            .iter()
            .enumerate()
            .fold((0.0_f32, 0.0_f32), |(sum, weights), (i, v)| {
                let w = (i as f32 + 1.0) / len;
                (sum + v * w, weights + w)
            });
        sum / weights
    }
}

#[derive(Clone, Debug, Default)]
pub struct BandHistories {
    pub bass: HistoryBuffer,
    pub mid: HistoryBuffer,
    pub treble: HistoryBuffer,
    pub overall: HistoryBuffer,
}

impl BandHistories {
    fn push(&mut self, bands: &BandEnergy) {
        self.bass.push(bands.bass);
        self.mid.push(bands.mid);
        self.treble.push(bands.treble);
        self.overall.push(bands.overall);
    }

    /// Smoothed read of all four bands.
    pub fn smoothed(&self) -> BandEnergy {
        BandEnergy {
            bass: self.bass.smoothed(),
            mid: self.mid.smoothed(),
            treble: self.treble.smoothed(),
            overall: self.overall.smoothed(),
        }
    }
}

pub struct FeatureExtractor {
    ranges: BandRanges,
    histories: BandHistories,
}

impl FeatureExtractor {
    pub fn new(bins: usize) -> Self {
        Self {
            ranges: BandRanges::for_bins(bins),
            histories: BandHistories::default(),
        }
    }

    pub fn ranges(&self) -> &BandRanges {
        &self.ranges
    }

    pub fn histories(&self) -> &BandHistories {
        &self.histories
    }

    /// Reduce `snapshot` to band means and push them onto the histories.
    pub fn extract(&mut self, snapshot: &[u8]) -> BandEnergy {
        let bands = BandEnergy {
            bass: mean(snapshot, &self.ranges.bass),
            mid: mean(snapshot, &self.ranges.mid),
            treble: mean(snapshot, &self.ranges.treble),
            overall: mean(snapshot, &(0..self.ranges.bins)),
        };
        self.histories.push(&bands);
        bands
    }
}

/// Mean over `range`, clamped to the snapshot; empty ranges read as silence.
fn mean(snapshot: &[u8], range: &Range<usize>) -> f32 {
    let end = range.end.min(snapshot.len());
    let start = range.start.min(end);
    let slice = &snapshot[start..end];
    if slice.is_empty() {
        return 0.0;
    }
    slice.iter().map(|&v| v as f32).sum::<f32>() / slice.len() as f32
}
