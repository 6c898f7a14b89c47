//! Fetch Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A download error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for download operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid download URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    #[display("unable to build HTTP client")]
    Client,
    #[display("unable to download {_0}")]
    Network(#[error(not(source))] String),
    #[display("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },
    #[display("I/O error at {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network("https://example.com".to_string()), true)]
    #[case(ErrorKind::HttpStatus { url: "https://example.com".to_string(), status: 503 }, true)]
    #[case(ErrorKind::HttpStatus { url: "https://example.com".to_string(), status: 404 }, false)]
    #[case(ErrorKind::Io(PathBuf::from("/tmp/jdk.zip")), false)]
    #[case(ErrorKind::InvalidUrl("nope".to_string()), false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] retryable: bool) {
        assert_eq!(kind.is_retryable(), retryable);
    }
}
