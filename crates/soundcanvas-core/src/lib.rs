//! Audio-reactive rendering engine for soundcanvas.
//!
//! Platform-free: the host supplies snapshots through [`SnapshotSource`] and a
//! drawing target through [`Surface`], then calls [`Visualizer::tick`] once
//! per display frame.

pub mod color;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod features;
pub mod modes;
pub mod particles;
pub mod surface;

pub use color::{adjust_opacity, ColorRegistry, Palette, Rgb};
pub use config::VisualizerConfig;
pub use driver::{Snapshot, SnapshotSource, TickOutcome, Visualizer};
pub use error::{CoreError, CoreResult};
pub use features::{BandEnergy, BandHistories, BandRanges, FeatureExtractor, HistoryBuffer};
pub use modes::Mode;
pub use particles::{Bounds, ForceModel, Particle, ParticleSystem, SpawnPattern, StepParams};
pub use surface::{DrawCall, DrawRecorder, Gradient, Paint, Painter, Surface};
