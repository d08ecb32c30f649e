use std::path::PathBuf;

use thiserror::Error;

/// Precondition failures detected before any solve is attempted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulationError {
    #[error("Dimension mismatch: {what} has {found} entries, expected {expected}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid value {value} for {what}")]
    InvalidValue { what: String, value: f64 },
    #[error("{names} weapon names given for {requirements} requirements")]
    NameCount { names: usize, requirements: usize },
    #[error("Lot {lot} does not exist (there are {lots} lots)")]
    LotOutOfRange { lot: usize, lots: usize },
}

/// Failures while loading or saving a data bundle
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    Invalid(#[from] FormulationError),
}
