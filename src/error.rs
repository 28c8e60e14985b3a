use std::io;

use thiserror::Error;

/// Everything that can end a simulation run. There are no retries anywhere:
/// a run is a single deterministic pass, so the first failure surfaces.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("line size must be positive")]
    ZeroLineSize,

    #[error("total size {total} is not a nonzero multiple of line size {line_size}")]
    UnevenTotal { total: u64, line_size: u64 },

    #[error("sets amount must be positive")]
    ZeroSets,

    #[error("total size {total} does not split evenly into {sets} sets")]
    UnevenSets { total: u64, sets: usize },

    #[error("unrecognized mode {0}, expected 0..=4")]
    UnknownMode(usize),

    #[error("no requests recorded, hit statistics are undefined")]
    EmptyTrace,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("serializing statistics: {0}")]
    Json(#[from] serde_json::Error),
}
