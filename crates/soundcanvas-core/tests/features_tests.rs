// Band split, history and smoothing behaviour of the feature extractor.

use rand::prelude::*;
use soundcanvas_core::constants::HISTORY_LEN;
use soundcanvas_core::{BandRanges, FeatureExtractor, HistoryBuffer};

#[test]
fn band_ranges_are_strictly_ordered_for_every_window() {
    for bins in [16usize, 32, 64, 100, 256, 512, 1024, 2048, 16384] {
        let r = BandRanges::for_bins(bins);
        assert_eq!(r.bass.start, 1);
        assert!(r.bass.end < r.mid.end, "bins={bins}");
        assert!(r.mid.end < r.treble.end, "bins={bins}");
        assert!(r.treble.end <= bins, "bins={bins}");
        assert_eq!(r.bass.end, r.mid.start);
        assert_eq!(r.mid.end, r.treble.start);
    }
}

#[test]
fn band_ranges_follow_fractions_of_n() {
    let r = BandRanges::for_bins(1024);
    assert_eq!(r.bass, 1..51);
    assert_eq!(r.mid, 51..307);
    assert_eq!(r.treble, 307..716);
}

#[test]
fn band_energies_stay_within_byte_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut extractor = FeatureExtractor::new(1024);
    for _ in 0..200 {
        let snapshot: Vec<u8> = (0..1024).map(|_| rng.gen()).collect();
        let bands = extractor.extract(&snapshot);
        for v in [bands.bass, bands.mid, bands.treble, bands.overall] {
            assert!((0.0..=255.0).contains(&v), "band energy {v} out of range");
        }
    }
}

#[test]
fn extract_averages_each_band() {
    let mut extractor = FeatureExtractor::new(1024);
    let mut snapshot = vec![0u8; 1024];
    for v in &mut snapshot[1..51] {
        *v = 200;
    }
    let bands = extractor.extract(&snapshot);
    assert!((bands.bass - 200.0).abs() < 1e-4);
    assert_eq!(bands.mid, 0.0);
    assert_eq!(bands.treble, 0.0);
    assert!((bands.overall - 200.0 * 50.0 / 1024.0).abs() < 1e-3);
    assert_eq!(extractor.histories().bass.latest(), bands.bass);
}

#[test]
fn history_length_is_invariant() {
    let mut h = HistoryBuffer::default();
    assert_eq!(h.len(), HISTORY_LEN);
    assert!(h.iter().all(|v| v == 0.0));
    for i in 0..500 {
        h.push(i as f32);
        assert_eq!(h.len(), 60);
        assert_eq!(h.iter().count(), 60);
    }
    assert_eq!(h.iter().next(), Some(440.0));
}

#[test]
fn smoothing_a_constant_buffer_returns_the_constant() {
    for v in [0.0_f32, 1.0, 42.5, 255.0] {
        let mut h = HistoryBuffer::default();
        for _ in 0..HISTORY_LEN {
            h.push(v);
        }
        assert!((h.smoothed() - v).abs() < 1e-3, "v={v} got {}", h.smoothed());
    }
}

#[test]
fn smoothing_weights_the_oldest_sample_least() {
    let mut h = HistoryBuffer::default();
    h.push(100.0);
    for _ in 1..HISTORY_LEN {
        h.push(0.0);
    }
    let weight_sum: f64 = (1..=60).map(|i| i as f64 / 60.0).sum();
    let expected = 100.0 * (1.0 / 60.0) / weight_sum;
    assert!(
        (h.smoothed() as f64 - expected).abs() < 1e-5,
        "expected {expected}, got {}",
        h.smoothed()
    );
}

#[test]
fn smoothing_favours_recent_samples() {
    let mut newest = HistoryBuffer::default();
    for _ in 0..HISTORY_LEN - 1 {
        newest.push(0.0);
    }
    newest.push(100.0);

    let mut oldest = HistoryBuffer::default();
    oldest.push(100.0);
    for _ in 0..HISTORY_LEN - 1 {
        oldest.push(0.0);
    }
    assert!((newest.smoothed() / oldest.smoothed() - 60.0).abs() < 1e-3);
}
