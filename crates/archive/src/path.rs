//! Entry name validation.
//!
//! Zip entry names are untrusted: a crafted archive can name an entry
//! `../../.bashrc`. Every name goes through [`validate`] before it is joined
//! onto the destination directory.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Normalizes an entry name into a path relative to the destination.
///
/// Leading slashes are dropped, `.` components removed and `..` resolved
/// against earlier components. A name that climbs above the destination,
/// names nothing, carries a drive prefix or contains a null byte is an
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// ```
/// use envkit_archive::validate_entry_path;
/// use std::path::Path;
/// assert_eq!(validate_entry_path("jdk-21/bin/java").unwrap(), Path::new("jdk-21/bin/java"));
/// assert_eq!(validate_entry_path("/jdk-21/./lib//").unwrap(), Path::new("jdk-21/lib"));
/// assert!(validate_entry_path("jdk-21/../../escape").is_err());
/// ```
pub fn validate(name: &str) -> Result<PathBuf> {
    let invalid = || ErrorKind::InvalidPath(name.to_string());
    let mut components = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(s) => {
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(invalid()),
        false => Ok(components.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jdk-21/release", "jdk-21/release")]
    #[case("jdk-21/bin/", "jdk-21/bin")]
    #[case("a//b/./c", "a/b/c")]
    #[case("/absolute/entry", "absolute/entry")]
    #[case("a/b/../c", "a/c")]
    fn test_valid(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(validate(name).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case::parent("../evil")]
    #[case::climbs_out("a/../../evil")]
    #[case::only_parents("../..")]
    #[case::empty("")]
    #[case::only_root("/")]
    #[case::null_byte("a\0b")]
    fn test_invalid(#[case] name: &str) {
        let err = validate(name).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(n) if n == name));
    }
}
