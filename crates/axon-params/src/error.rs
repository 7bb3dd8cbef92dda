//! Error types for parameter ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for parameter operations
pub type Result<T> = std::result::Result<T, ParamError>;

/// Errors that can occur while loading network parameters
#[derive(Debug, Error)]
pub enum ParamError {
    /// No weight files found in the parameter directory
    #[error("no weight files found under {dir} (expected weights_0.txt)")]
    NoLayers {
        /// Directory that was probed
        dir: PathBuf,
    },

    /// A parameter file exists but holds no scalars
    #[error("parameter file is empty: {path}")]
    Empty {
        /// Offending file
        path: PathBuf,
    },

    /// A line is not a valid fixed-point scalar for the configured format
    #[error("{path}:{line}: not a {bits}-bit binary scalar: {content:?}")]
    BadScalar {
        /// Offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Expected bit count
        bits: u32,
        /// The offending line content
        content: String,
    },

    /// A weights file ends mid-row (scalars after the last delimiter)
    #[error("{path}: trailing scalars after the last row delimiter")]
    UnterminatedRow {
        /// Offending file
        path: PathBuf,
    },

    /// A row's column count differs from the first row's
    #[error("{path}: row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        /// Offending file
        path: PathBuf,
        /// 0-based row index
        row: usize,
        /// Column count of row 0
        expected: usize,
        /// Column count of the offending row
        got: usize,
    },

    /// I/O error reading or writing a parameter file
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Core data-model validation failed (shape or width chain)
    #[error(transparent)]
    Chip(#[from] axon_chip::ChipError),
}

impl ParamError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
