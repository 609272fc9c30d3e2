use thiserror::Error;

/// Errors that can occur while preparing annotation targets.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PrepError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("RLE counts sum to {actual}, expected {expected} for a {h}x{w} mask")]
    RleLength {
        h: u32,
        w: u32,
        expected: u64,
        actual: u64,
    },

    #[error("malformed compressed RLE string at byte {0}")]
    RleString(usize),

    #[error("raster is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}
