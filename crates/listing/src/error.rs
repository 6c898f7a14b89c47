//! Listing Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A listing error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for listing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing page could not be fetched at all (DNS, TLS, connection).
    #[display("unable to fetch listing page: {_0}")]
    Network(#[error(not(source))] String),
    /// The server answered, but not with a success status.
    #[display("listing page {url} returned status {status}")]
    HttpStatus {
        /// The page that was requested.
        url: String,
        /// The HTTP status code returned.
        status: u16,
    },
    /// The response body is not a markup document we can read.
    #[display("malformed HTML: {_0}")]
    MalformedHtml(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate retries; the answer is for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::MalformedHtml(_) => false,
        }
    }
}
