//! Link extraction from directory-listing pages.

use crate::consts::{CHECKSUM_MARKER, TBODY_ANCHOR_SELECTOR};
use crate::error::{ErrorKind, Result};
use crate::links::{LinkEntry, Links};
use exn::ResultExt;
use scraper::Html;
use std::convert::Infallible;
use std::str::FromStr;
use tracing::instrument;

/// A parsed listing page.
///
/// Listing pages (such as <https://jdk.java.net/archive/>) lay their
/// downloads out in tables; only anchors inside a `<tbody>` are considered.
#[derive(Debug)]
pub struct Listing {
    document: Html,
}
impl Listing {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// Parse a raw response body.
    ///
    /// The HTML parser itself never rejects input, so the only body we refuse
    /// is one that isn't text at all.
    pub fn from_bytes(body: impl AsRef<[u8]>) -> Result<Self> {
        let html = std::str::from_utf8(body.as_ref())
            .or_raise(|| ErrorKind::MalformedHtml("response body is not valid UTF-8".to_string()))?;
        Ok(Self::from_html(html))
    }

    /// Every anchor `href` inside a table body, in document order.
    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.document.select(&TBODY_ANCHOR_SELECTOR).filter_map(|anchor| anchor.value().attr("href"))
    }

    /// Entries whose link contains `filter` and isn't a checksum, in document
    /// order. Entries may share a name.
    pub fn entries<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = LinkEntry> + 'a {
        self.hrefs().filter(move |href| is_candidate(href, filter)).map(LinkEntry::new)
    }

    /// Collects [`entries`](Self::entries) into a name-to-link mapping.
    /// Later entries replace earlier ones with the same name.
    #[instrument(level = "debug", skip(self), fields(links))]
    pub fn links(&self, filter: &str) -> Links {
        let mut links = Links::new();
        for entry in self.entries(filter) {
            tracing::trace!(name = %entry.name, link = %entry.link, "Found candidate link");
            if let Some(replaced) = links.insert(entry.name, entry.link) {
                tracing::trace!(%replaced, "Link replaced by a later one with the same name");
            }
        }
        tracing::Span::current().record("links", links.len());
        links
    }
}
impl FromStr for Listing {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<Html> for Listing {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

fn is_candidate(href: &str, filter: &str) -> bool {
    href.contains(filter) && !href.contains(CHECKSUM_MARKER)
}

/// Extracts the filtered name-to-link mapping straight from an HTML string.
///
/// ```rust
/// use envkit_listing::parse_links;
/// let html = r#"
///     <table><tbody>
///         <tr><td><a href="https://example.com/openjdk-21_linux-x64_bin.zip">zip</a></td></tr>
///         <tr><td><a href="https://example.com/openjdk-21_linux-x64_bin.zip.sha256">sha256</a></td></tr>
///     </tbody></table>
/// "#;
/// let links = parse_links(html, "zip");
/// assert_eq!(links.len(), 1);
/// assert_eq!(links["openjdk-21"], "https://example.com/openjdk-21_linux-x64_bin.zip");
/// ```
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_links(html: &str, filter: &str) -> Links {
    Listing::from_html(html).links(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(hrefs: &[&str]) -> String {
        let rows: String =
            hrefs.iter().map(|href| format!(r#"<tr><td><a href="{href}">{href}</a></td></tr>"#)).collect();
        format!("<!DOCTYPE html><html><body><table><tbody>{rows}</tbody></table></body></html>")
    }

    #[test]
    fn test_filters_checksums_and_other_formats() {
        let html = table(&["a_1.zip", "a_1.zip.sha256", "b_2.tar"]);
        let links = parse_links(&html, "zip");
        assert_eq!(links, Links::from([("a".to_string(), "a_1.zip".to_string())]));
    }

    #[test]
    fn test_last_link_wins_on_name_collision() {
        let html = table(&["x_1.zip", "x_2.zip"]);
        let links = parse_links(&html, "zip");
        assert_eq!(links.len(), 1);
        assert_eq!(links["x"], "x_2.zip");
    }

    #[test]
    fn test_collision_order_follows_document_across_tables() {
        let html = format!("{}{}", table(&["x_2.zip"]), table(&["y_1.zip", "x_1.zip"]));
        let links = parse_links(&html, "zip");
        assert_eq!(links["x"], "x_1.zip");
        assert_eq!(links["y"], "y_1.zip");
    }

    #[test]
    fn test_ignores_anchors_outside_table_bodies() {
        let html = r#"
            <html><body>
                <a href="outside_1.zip">outside</a>
                <table>
                    <thead><tr><th><a href="header_1.zip">header</a></th></tr></thead>
                    <tbody><tr><td><a href="inside_1.zip">inside</a></td></tr></tbody>
                </table>
            </body></html>
        "#;
        let links = parse_links(html, "zip");
        assert_eq!(links.keys().collect::<Vec<_>>(), vec!["inside"]);
    }

    #[test]
    fn test_implicit_table_body_is_scanned() {
        // The HTML parser inserts the `<tbody>` that this markup omits.
        let html = r#"<table><tr><td><a href="implicit_1.zip">zip</a></td></tr></table>"#;
        let links = parse_links(html, "zip");
        assert_eq!(links["implicit"], "implicit_1.zip");
    }

    #[test]
    fn test_skips_anchors_without_href() {
        let html = r#"<table><tbody><tr><td><a name="zip">zip</a><a href="ok_1.zip">ok</a></td></tr></tbody></table>"#;
        let listing = Listing::from_html(html);
        assert_eq!(listing.hrefs().collect::<Vec<_>>(), vec!["ok_1.zip"]);
    }

    #[test]
    fn test_checksum_marker_anywhere_in_link_excludes_it() {
        let html = table(&["https://example.com/sha256/jdk_1.zip", "https://example.com/jdk_2.zip"]);
        let links = parse_links(&html, "zip");
        assert_eq!(links["jdk"], "https://example.com/jdk_2.zip");
    }

    #[test]
    fn test_empty_listing() {
        let links = parse_links("<html><body><p>Nothing to see</p></body></html>", "zip");
        assert!(links.is_empty());
    }

    #[test]
    fn test_entries_keep_duplicates() {
        let html = table(&["x_1.zip", "x_2.zip"]);
        let listing: Listing = html.parse().unwrap();
        let entries: Vec<_> = listing.entries("zip").collect();
        assert_eq!(entries, vec![LinkEntry::new("x_1.zip"), LinkEntry::new("x_2.zip")]);
    }

    #[test]
    fn test_from_bytes_rejects_non_text() {
        let result = Listing::from_bytes([0xff, 0xfe, 0x00, 0x3c]);
        let err = result.unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedHtml(_)));
    }

    #[test]
    fn test_from_bytes_accepts_html() {
        let listing = Listing::from_bytes(table(&["jdk_1.zip"]).into_bytes()).unwrap();
        assert_eq!(listing.links("zip").len(), 1);
    }
}
