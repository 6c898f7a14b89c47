//! Link models.

use crate::consts::NAME_DELIMITER;
use std::collections::BTreeMap;

/// Artifact name to download link.
///
/// A name appears at most once; when several links collapse onto the same
/// name, the one found last in the document is kept.
pub type Links = BTreeMap<String, String>;

/// A single `(name, link)` pair found while scanning a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkEntry {
    /// Derived from the link, see [`artifact_name`].
    pub name: String,
    /// The `href` exactly as it appeared in the document.
    pub link: String,
}
impl LinkEntry {
    pub fn new(link: impl Into<String>) -> Self {
        let link = link.into();
        Self { name: artifact_name(&link).to_string(), link }
    }
}
impl From<LinkEntry> for (String, String) {
    fn from(entry: LinkEntry) -> Self {
        (entry.name, entry.link)
    }
}

/// Derives an artifact name from a link: the trailing path segment, cut at
/// the first `_`.
///
/// The trailing segment is taken the same way as a POSIX `basename`:
/// trailing slashes are ignored, an empty link becomes `.` and a link made
/// only of slashes becomes `/`.
///
/// ```
/// use envkit_listing::artifact_name;
/// assert_eq!(
///     artifact_name("https://download.java.net/java/GA/jdk24/GPL/openjdk-24_windows-x64_bin.zip"),
///     "openjdk-24",
/// );
/// assert_eq!(artifact_name("jdk-17.zip"), "jdk-17.zip");
/// ```
pub fn artifact_name(link: &str) -> &str {
    if link.is_empty() {
        return ".";
    }
    let trimmed = link.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    base.split(NAME_DELIMITER).next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a_1.zip", "a")]
    #[case("x_2.zip", "x")]
    #[case("https://download.java.net/java/GA/jdk24/GPL/openjdk-24_windows-x64_bin.zip", "openjdk-24")]
    #[case("/java/GA/jdk9/9/binaries/openjdk-9_osx-x64_bin.tar.gz", "openjdk-9")]
    #[case("openjdk-21.zip", "openjdk-21.zip")]
    #[case("dir/with_underscore/file.zip", "file.zip")]
    #[case("dir/file_a_b_c.zip", "file")]
    #[case("trailing/slash_1/", "slash")]
    #[case("_leading.zip", "")]
    #[case("", ".")]
    #[case("///", "/")]
    fn test_artifact_name(#[case] link: &str, #[case] expected: &str) {
        assert_eq!(artifact_name(link), expected);
    }

    #[test]
    fn test_link_entry_keeps_link_verbatim() {
        let entry = LinkEntry::new("https://example.com/jdk-11_linux.zip?mirror=1");
        assert_eq!(entry.name, "jdk-11");
        assert_eq!(entry.link, "https://example.com/jdk-11_linux.zip?mirror=1");
        let (name, link): (String, String) = entry.into();
        assert_eq!(name, "jdk-11");
        assert!(link.ends_with("?mirror=1"));
    }
}
