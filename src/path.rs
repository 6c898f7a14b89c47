//! `PATH`-style variable editing.

#[cfg(windows)]
const SEPARATOR: char = ';';
#[cfg(not(windows))]
const SEPARATOR: char = ':';

/// Returns `current` with `segment` appended, or `None` if an equal entry is
/// already present.
///
/// Entries are compared after trimming whitespace, ignoring case.
pub fn with_segment(current: &str, segment: &str) -> Option<String> {
    let wanted = segment.trim().to_lowercase();
    if current.split(SEPARATOR).any(|entry| entry.trim().to_lowercase() == wanted) {
        return None;
    }
    match current.trim().is_empty() {
        true => Some(segment.to_string()),
        false => Some(format!("{current}{SEPARATOR}{segment}")),
    }
}
