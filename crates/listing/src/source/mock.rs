//! In-memory listing source for testing.

use crate::error::{ErrorKind, Result};
use crate::source::ListingSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory listing source for testing.
///
/// Pages are stored in a `HashMap` behind a [`RwLock`], and every call to
/// [`fetch`](ListingSource::fetch) is counted, so tests can assert that a
/// cached result really did avoid the "network".
#[derive(Default)]
pub struct MockSource {
    pages: RwLock<HashMap<String, Vec<u8>>>,
    failures: RwLock<HashMap<String, ErrorKind>>,
    calls: AtomicUsize,
}
impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source pre-populated with pages.
    pub fn with_pages<U, B>(pages: impl IntoIterator<Item = (U, B)>) -> Self
    where
        U: Into<String>,
        B: AsRef<[u8]>,
    {
        let pages = pages.into_iter().map(|(url, body)| (url.into(), body.as_ref().to_vec())).collect();
        Self { pages: RwLock::new(pages), ..Self::default() }
    }

    /// Add or replace a page, clearing any failure set for it.
    pub async fn insert(&self, url: impl Into<String>, body: impl AsRef<[u8]>) {
        let url = url.into();
        self.failures.write().await.remove(&url);
        self.pages.write().await.insert(url, body.as_ref().to_vec());
    }

    /// Make every fetch of `url` fail with `kind` until it is replaced.
    pub async fn fail(&self, url: impl Into<String>, kind: ErrorKind) {
        self.failures.write().await.insert(url.into(), kind);
    }

    /// Number of times [`fetch`](ListingSource::fetch) has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.failures.read().await.get(url) {
            exn::bail!(kind.clone());
        }
        match self.pages.read().await.get(url) {
            Some(body) => Ok(body.clone()),
            // Unknown pages behave like a server answering 404.
            None => exn::bail!(ErrorKind::HttpStatus { url: url.to_string(), status: 404 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_every_fetch() {
        let source = MockSource::with_pages([("https://example.com/", "<table><tbody></tbody></table>")]);
        assert!(source.fetch("https://example.com/").await.is_ok());
        let err = source.fetch("https://example.com/missing").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::HttpStatus { status: 404, .. }));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_insert_replaces_page() {
        let source = MockSource::new();
        source.insert("https://example.com/", "first").await;
        source.insert("https://example.com/", "second").await;
        assert_eq!(source.fetch("https://example.com/").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let source = MockSource::with_pages([("https://example.com/", "page")]);
        source.fail("https://example.com/", ErrorKind::Network("https://example.com/".to_string())).await;
        let err = source.fetch("https://example.com/").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        source.insert("https://example.com/", "page").await;
        assert_eq!(source.fetch("https://example.com/").await.unwrap(), b"page");
    }
}
