//! Error types for onco-vcf
//!
//! Fatal errors abort the run. Row and group warnings are recovered
//! locally, logged, and counted in the run report.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for onco-vcf operations
#[derive(Debug, Error)]
pub enum OncoVcfError {
    /// Input file missing or unreadable
    #[error("Cannot read input file {path:?}: {source}")]
    InputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required columns absent from the input header
    #[error("Input is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Malformed delimited table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output could not be written or moved into place
    #[error("Failed to write output {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External sort utility failed to launch or exited nonzero
    #[error("External sort with '{program}' failed: {message}")]
    ExternalSort { program: String, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A row dropped by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordWarning {
    /// `date_last_evaluated` missing or unparseable
    DateParse { row: usize, value: String },
    /// A field of the identity key is missing
    MissingKey { row: usize, field: &'static str },
    /// `start` is not an unsigned integer
    InvalidStart { row: usize, value: String },
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordWarning::DateParse { row, value } => {
                write!(f, "row {}: unparseable date_last_evaluated '{}'", row, value)
            }
            RecordWarning::MissingKey { row, field } => {
                write!(f, "row {}: missing identity field '{}'", row, field)
            }
            RecordWarning::InvalidStart { row, value } => {
                write!(f, "row {}: invalid start '{}'", row, value)
            }
        }
    }
}

/// A variant group that could not produce a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupWarning {
    /// No record in the group carries a valid date
    EmptyGroup { key: String },
}

impl fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupWarning::EmptyGroup { key } => {
                write!(f, "group {} has no dated records; skipped", key)
            }
        }
    }
}

/// Result type alias for onco-vcf operations
pub type Result<T> = std::result::Result<T, OncoVcfError>;
