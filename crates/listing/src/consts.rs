use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

/// Links sitting next to the real artifacts that point at checksum files.
pub(crate) const CHECKSUM_MARKER: &str = "sha256";
/// Artifact names stop at the first underscore (`openjdk-24_linux-x64_bin.tar.gz`).
pub(crate) const NAME_DELIMITER: char = '_';

// Every anchor inside a table body, in document order. Anchors without an
// `href` are matched too and skipped during the scan.
selector!(TBODY_ANCHOR_SELECTOR, "tbody a");
