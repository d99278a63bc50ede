//! Error types.
//!
//! Each concern has its own enum; `Error` wraps them for callers that mix
//! decoding, validation and conversion in one pipeline.

use crate::config::ConfigError;
use crate::schema::wire::WireError;
use crate::schema::DataType;

/// Errors raised while turning an `NdArray` into a typed view.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unsupported dtype enum value {0}")]
    UnsupportedDType(i32),

    #[error("dtype mismatch: array holds {expected}, {requested} was requested")]
    DTypeMismatch {
        expected: DataType,
        requested: DataType,
    },

    #[error(
        "shape mismatch: shape {shape:?} of {dtype} needs {expected} bytes, raw_data has {actual}"
    )]
    ShapeMismatch {
        shape: Vec<u64>,
        dtype: DataType,
        expected: u64,
        actual: u64,
    },

    #[error("shape {shape:?} overflows the addressable element count")]
    ShapeOverflow { shape: Vec<u64> },

    #[error("layout error: {0}")]
    Layout(#[from] ndarray::ShapeError),
}

/// Errors raised by structural validation of a `BoardState`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("node feature mismatch: expected {expected}, got {actual}")]
    NodeFeatureMismatch { expected: u64, actual: u64 },

    #[error("edge feature mismatch: expected {expected}, got {actual}")]
    EdgeFeatureMismatch { expected: u64, actual: u64 },

    #[error("{field} has rank {rank}, expected at least 2 dimensions")]
    MissingFeatureDim { field: &'static str, rank: usize },
}

/// Any error produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
