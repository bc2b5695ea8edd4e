// Error types for the expense store
// Validation failures are reported to the user, IO/CSV failures mean nothing was persisted

use crate::amount::Amount;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expense name must not be empty")]
    EmptyName,

    #[error("invalid amount '{0}', enter a number like 150.50")]
    InvalidAmount(String),

    #[error("amount '{0}' is too large for a single expense")]
    AmountTooLarge(String),

    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Amount),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the user gave bad input, as opposed to a failed write.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// A row of the backing file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}
