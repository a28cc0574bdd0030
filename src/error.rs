use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal errors – reported before any drawing happens
// ---------------------------------------------------------------------------

/// Which axis of the seismic matrix a shape check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Columns (traces / receivers).
    Traces,
    /// Rows (time samples).
    Samples,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Traces => write!(f, "traces"),
            Axis::Samples => write!(f, "samples"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeismicError {
    /// Malformed plot parameter (range with the wrong element count,
    /// out-of-bounds endpoint, invalid percentile, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A coordinate array or header table disagrees with the matrix.
    #[error("shape mismatch on {axis}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        axis: Axis,
        expected: usize,
        actual: usize,
    },
}

impl SeismicError {
    pub fn config(msg: impl Into<String>) -> Self {
        SeismicError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SeismicError>;

// ---------------------------------------------------------------------------
// Non-fatal warnings – rendering proceeds with a fallback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Warning {
    /// Zero amplitude range; scaling was skipped instead of dividing by zero.
    DegenerateScale { stage: &'static str },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DegenerateScale { stage } => {
                write!(f, "{stage}: zero amplitude range, scaling skipped")
            }
        }
    }
}
