// Shared tuning constants for extraction, simulation and the render modes.

use std::f32::consts::TAU;

// Feature history
pub const HISTORY_LEN: usize = 60; // ticks of rolling history per band

// Band boundaries as fractions of the bin count
pub const BASS_END_FRACTION: f32 = 0.05;
pub const MID_END_FRACTION: f32 = 0.3;
pub const TREBLE_END_FRACTION: f32 = 0.7;
pub const MIN_BIN_COUNT: usize = 16; // smallest N for which the band split stays strictly ordered

// Magnitudes are bytes
pub const MAX_MAGNITUDE: f32 = 255.0;
pub const SILENCE_LEVEL: f32 = 128.0; // time-domain centre line

// Particle spawn ranges
pub const DEFAULT_PARTICLE_COUNT: usize = 150;
pub const SPAWN_JITTER_FRACTION: f32 = 0.8; // of the viewport extent
pub const SPAWN_SPEED: f32 = 0.5; // velocity components drawn from [-SPAWN_SPEED, SPAWN_SPEED]
pub const SIZE_MIN: f32 = 1.0;
pub const SIZE_MAX: f32 = 4.0;
pub const LIFE_MIN: f32 = 100.0;
pub const LIFE_MAX: f32 = 250.0;
pub const ORBIT_RADIUS_MIN: f32 = 50.0;
pub const ORBIT_RADIUS_MAX: f32 = 150.0;
pub const BURST_RADIUS_MIN: f32 = 20.0;
pub const BURST_RADIUS_MAX: f32 = 60.0;
pub const BURST_SPEED_MIN: f32 = 0.5;
pub const BURST_SPEED_MAX: f32 = 1.5;
pub const RANDOM_RESPAWN_CHANCE: f32 = 0.001; // per particle per tick

// Guard for direction vectors
pub const DEGENERATE_DISTANCE: f32 = 1e-3;

// Background trail fade painted before every frame
pub const BACKGROUND_FADE: &str = "rgba(26, 26, 26, 0.2)";

// Flower
pub const FLOWER_BASE_PETALS: usize = 7;
pub const FLOWER_MID_PER_PETAL: f32 = 25.0;
pub const FLOWER_LAYERS: usize = 4;
pub const FLOWER_SAMPLES_PER_PETAL: usize = 12;
pub const FLOWER_STAMEN_BASS: f32 = 100.0;
pub const FLOWER_REPEL_THRESHOLD: f32 = 0.7; // normalized smoothed bass
pub const FLOWER_DAMPING: f32 = 0.96;
pub const FLOWER_LIFE_DECAY_BASE: f32 = 0.3;

// Orbital
pub const ORBITAL_RINGS: usize = 5;
pub const ORBITAL_MOON_SIZE: f32 = 10.0; // planets larger than this carry moons
pub const ORBITAL_DAMPING: f32 = 0.97;
pub const ORBITAL_LIFE_DECAY_BASE: f32 = 0.1;

// Spectrum
pub const SPECTRUM_BARS: usize = 256;
pub const SPECTRUM_CAP_FRACTION: f32 = 0.7; // of half height

// Nebula
pub const NEBULA_CORE_RADIUS: f32 = 200.0;
pub const NEBULA_DAMPING: f32 = 0.97;
pub const NEBULA_LIFE_DECAY_BASE: f32 = 0.2;
pub const NEBULA_CONNECT_BASE: f32 = 80.0;
pub const DEFAULT_CONNECTION_STRIDE: usize = 5;

// Kaleidoscope
pub const KALEIDOSCOPE_SEGMENTS: usize = 8;
pub const KALEIDOSCOPE_ARCS: usize = 10;

// Constellation
pub const PEAK_MIN_SPACING: usize = 5; // bins between accepted peaks
pub const PEAK_THRESHOLD_BASE: f32 = 40.0;
pub const PEAK_THRESHOLD_VOLUME: f32 = 1.2;
pub const PEAK_THRESHOLD_MAX: f32 = 230.0;
pub const CONSTELLATION_MAX_STARS: usize = 64;
pub const CONSTELLATION_DAMPING: f32 = 0.98;
pub const CONSTELLATION_LIFE_DECAY_BASE: f32 = 0.1;

#[inline]
pub fn normalized(value: f32) -> f32 {
    (value / MAX_MAGNITUDE).clamp(0.0, 1.0)
}

#[inline]
pub fn segment_angle(segments: usize) -> f32 {
    TAU / segments.max(1) as f32
}
