//! Download link discovery from HTML directory-listing pages.
//!
//! A listing page (for example <https://jdk.java.net/archive/>) is fetched
//! through a [`ListingSource`], every anchor inside a table body is
//! inspected, and links matching a filter keyword are collected into
//! [`Links`], keyed by an artifact name derived from the link itself.

mod consts;
pub mod error;
mod links;
mod listing;
pub mod source;

use crate::error::Result;
pub use crate::links::{LinkEntry, Links, artifact_name};
pub use crate::listing::{Listing, parse_links};
pub use crate::source::ListingSource;
use std::sync::Arc;
use tracing::instrument;

pub type SourceHandle = Arc<dyn ListingSource + Send + Sync>;

/// Fetch the listing page at `url` and collect the links containing `filter`.
///
/// A single request is made; a failed request or non-success status is
/// returned as-is and never retried.
///
/// # Errors
///
/// - [`Network`](error::ErrorKind::Network) or
///   [`HttpStatus`](error::ErrorKind::HttpStatus) if the page could not be
///   fetched.
/// - [`MalformedHtml`](error::ErrorKind::MalformedHtml) if the body isn't
///   readable as markup.
#[instrument(skip(source), fields(source = source.name(), links))]
pub async fn scrape(source: &dyn ListingSource, url: &str, filter: &str) -> Result<Links> {
    let body = source.fetch(url).await?;
    let links = Listing::from_bytes(body)?.links(filter);
    tracing::Span::current().record("links", links.len());
    Ok(links)
}
