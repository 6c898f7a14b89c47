use envkit_listing::Links;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// A set of resolved links and the moment they were scraped.
///
/// Serialized as `{"timestamp": "<RFC 3339>", "links": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub links: Links,
}
impl CacheSnapshot {
    /// Snapshot of links that were scraped just now.
    pub fn new(links: Links) -> Self {
        Self::at(OffsetDateTime::now_utc(), links)
    }

    pub fn at(timestamp: OffsetDateTime, links: Links) -> Self {
        Self { timestamp, links }
    }

    /// How long ago the links were scraped, relative to `now`.
    pub fn age(&self, now: OffsetDateTime) -> Duration {
        now - self.timestamp
    }

    /// Whether the snapshot is younger than `max_age`.
    ///
    /// A snapshot whose timestamp lies in the future (clock skew) counts as
    /// fresh.
    pub fn is_fresh(&self, max_age: Duration, now: OffsetDateTime) -> bool {
        self.age(now) < max_age
    }
}
