use thiserror::Error;

/// Errors raised for caller mistakes at the public command surface.
///
/// Geometry and range problems that come from extreme audio never end up
/// here; those are corrected in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown mode `{0}`")]
    UnknownMode(String),
    #[error("unknown color scheme `{0}`")]
    UnknownColorScheme(String),
    #[error("snapshot has {actual} bins, expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
