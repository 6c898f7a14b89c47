//! Where listing pages come from.
//!
//! The [`ListingSource`] trait is the only place this crate touches the
//! network. Production code uses [`HttpSource`]; tests swap in
//! [`MockSource`] so that parsing and caching can be exercised offline.

#[cfg(feature = "http")]
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(feature = "http")]
pub use self::http::HttpSource;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockSource;
use crate::error::Result;
use async_trait::async_trait;

/// Fetches the raw body of a listing page.
///
/// Implementations make exactly one attempt per call: no retries, no
/// fallbacks. Any non-success response is an error.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Name of the source, used for logging only.
    fn name(&self) -> &str;

    /// Fetch the page at `url` and return its body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
