//! On-disk snapshot cache for resolved download links.
//!
//! Scraping a listing page is slow and the page rarely changes, so the
//! resolved name-to-link mapping is kept in a small JSON file together with
//! the time it was scraped. The file is disposable: if it's missing, corrupt
//! or can't be written, resolution still works, it just hits the network.

pub mod error;
mod resolver;
mod snapshot;
mod store;

pub use crate::resolver::{DEFAULT_MAX_AGE, Resolver};
pub use crate::snapshot::CacheSnapshot;
pub use crate::store::SnapshotStore;
