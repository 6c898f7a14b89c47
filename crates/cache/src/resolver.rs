//! Cache-aside link resolution.

use crate::error::{ErrorKind, Result};
use crate::snapshot::CacheSnapshot;
use crate::store::SnapshotStore;
use envkit_listing::{Links, SourceHandle};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

/// Cached snapshots older than this are scraped again.
pub const DEFAULT_MAX_AGE: Duration = Duration::days(30);

/// Resolves download links, preferring a recent on-disk snapshot over
/// fetching the listing page.
///
/// The snapshot isn't keyed by URL or filter: whatever was scraped last is
/// what a fresh cache hit returns.
pub struct Resolver {
    source: SourceHandle,
    store: SnapshotStore,
    max_age: Duration,
}
impl Resolver {
    pub fn new(source: SourceHandle, store: SnapshotStore) -> Self {
        Self { source, store, max_age: DEFAULT_MAX_AGE }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Return the cached links if they are fresh, otherwise scrape `url`.
    ///
    /// A cache that is missing, corrupt or unreadable counts as a miss.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Resolve`] if a scrape was needed and failed. A stale
    /// snapshot is never used as a fallback.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn resolve(&self, url: &str, filter: &str) -> Result<Links> {
        let now = OffsetDateTime::now_utc();
        match self.store.load().await {
            Ok(snapshot) if snapshot.is_fresh(self.max_age, now) => {
                tracing::debug!(timestamp = %snapshot.timestamp, links = snapshot.links.len(), "Cache hit");
                return Ok(snapshot.links);
            },
            Ok(snapshot) => tracing::info!(timestamp = %snapshot.timestamp, "Cached links have expired"),
            Err(err) if matches!(&*err, ErrorKind::NotFound(_)) => tracing::debug!("No cached links"),
            Err(err) => tracing::warn!(error = ?err, "Ignoring unusable link cache"),
        }
        self.refresh(url, filter).await
    }

    /// Scrape `url` regardless of the cache, then try to persist the result.
    ///
    /// Failing to persist is logged and otherwise ignored; the freshly scraped
    /// links are returned either way.
    #[instrument(skip(self), fields(source = self.source.name(), links))]
    pub async fn refresh(&self, url: &str, filter: &str) -> Result<Links> {
        let links = envkit_listing::scrape(&*self.source, url, filter).await.map_err(|err| {
            let retryable = err.is_retryable();
            err.raise(ErrorKind::Resolve { url: url.to_string(), retryable })
        })?;
        tracing::Span::current().record("links", links.len());
        let snapshot = CacheSnapshot::new(links);
        if let Err(err) = self.store.save(&snapshot).await {
            tracing::warn!(error = ?err, "Unable to persist link cache");
        }
        Ok(snapshot.links)
    }
}
