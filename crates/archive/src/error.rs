//! Archive Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The archive is missing, unreadable or not a zip container. Fatal.
    #[display("unable to open archive {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// Entry name contains invalid characters or escapes the destination.
    #[display("invalid entry path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    #[display("unable to create directory {}", _0.display())]
    CreateDirectory(#[error(not(source))] PathBuf),
    #[display("unable to create file {}", _0.display())]
    CreateFile(#[error(not(source))] PathBuf),
    #[display("unable to read archive entry {_0}")]
    ReadEntry(#[error(not(source))] String),
    #[display("unable to write entry contents to {}", _0.display())]
    Copy(#[error(not(source))] PathBuf),
    /// The blocking task extracting an entry panicked or was cancelled.
    #[display("extraction worker for {_0} did not complete")]
    Worker(#[error(not(source))] String),
    #[display("{failed} of {entries} archive entries failed to extract")]
    PartialExtraction { failed: usize, entries: usize },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CreateDirectory(_) | Self::CreateFile(_) | Self::Copy(_) | Self::PartialExtraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::PartialExtraction { failed: 1, entries: 3 }.to_string(), "1 of 3 archive entries failed to extract");
        assert_eq!(ErrorKind::InvalidPath("../evil".to_string()).to_string(), "invalid entry path: ../evil");
    }
}
