//! Unified error handling for tkl2gpx.
//!
//! Decoder-level errors are fatal for the file they occur in; whether they
//! abort the whole run is an orchestrator policy (see [`crate::convert`]).

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for tkl2gpx operations.
#[derive(Debug, Error)]
pub enum TklError {
    /// The buffer does not have the structure of a TKL file.
    #[error("malformed TKL input: {reason}")]
    MalformedInput { reason: String },

    /// The trailing bytes do not form a whole number of track-point records.
    #[error("truncated TKL record: {trailing} trailing bytes left over ({record_size}-byte records)")]
    TruncatedRecord { trailing: usize, record_size: usize },

    /// The output root is missing or not a directory. Checked once at
    /// startup and always fatal for the whole run.
    #[error("output path is not an existing directory: {}", path.display())]
    OutputPathInvalid { path: PathBuf },

    /// Read or write failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for tkl2gpx operations.
pub type Result<T> = std::result::Result<T, TklError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TklError::MalformedInput {
            reason: "bad magic".to_string(),
        };
        assert!(err.to_string().contains("bad magic"));

        let err = TklError::TruncatedRecord {
            trailing: 7,
            record_size: 24,
        };
        assert!(err.to_string().contains("7 trailing bytes"));
    }
}
