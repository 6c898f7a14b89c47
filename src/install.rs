//! Where an installed build ends up.

use envkit_archive::{ArchiveEntry, validate_entry_path};
use reqwest::Url;
use std::path::{Path, PathBuf};

/// Resolves a listing link against the page it was found on.
///
/// Absolute links are returned unchanged.
pub fn absolute_link(listing_url: &str, link: &str) -> Option<Url> {
    Url::parse(listing_url).ok()?.join(link).ok()
}

/// File name to download `url` to, falling back to `<name>.zip`.
pub fn archive_file_name(url: &Url, name: &str) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{name}.zip"))
}

/// The directory an archive unpacks into below `destination`.
///
/// JDK archives wrap everything in a single top-level directory
/// (`jdk-21/bin/java`); when every entry shares one, that directory is the
/// home. Otherwise the archive unpacks straight into `destination`.
pub fn home_dir(destination: &Path, entries: &[ArchiveEntry]) -> PathBuf {
    let mut root: Option<PathBuf> = None;
    for entry in entries {
        let Ok(path) = validate_entry_path(&entry.name) else {
            continue;
        };
        let mut components = path.components();
        let (Some(first), nested) = (components.next(), components.next().is_some()) else {
            continue;
        };
        if !nested && !entry.is_dir {
            return destination.to_path_buf();
        }
        let first = PathBuf::from(first.as_os_str());
        match &root {
            None => root = Some(first),
            Some(existing) if *existing == first => {},
            Some(_) => return destination.to_path_buf(),
        }
    }
    root.map(|root| destination.join(root)).unwrap_or_else(|| destination.to_path_buf())
}
