//! Cache Error Types
//!
//! Snapshot load and save failures are never fatal to a resolution: the
//! resolver logs them and carries on. Only a failed scrape surfaces as
//! [`ErrorKind::Resolve`].

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("no cached snapshot at {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("cached snapshot could not be read: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    #[display("cached snapshot could not be written: {}", _0.display())]
    Unwritable(#[error(not(source))] PathBuf),
    /// Serialization/deserialization error.
    #[display("invalid cache data")]
    InvalidData,
    /// The listing had to be scraped and the scrape failed.
    #[display("unable to resolve links from {url}")]
    Resolve {
        url: String,
        /// Carried over from the scrape failure that caused this.
        retryable: bool,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Resolve { retryable: true, .. })
    }
}
