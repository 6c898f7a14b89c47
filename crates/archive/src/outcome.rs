use crate::error::{Error, ErrorKind, Result};

/// An entry that could not be extracted, and why.
#[derive(Debug)]
pub struct EntryFailure {
    /// Entry name as stored in the archive.
    pub path: String,
    pub error: Error,
}

/// Aggregate result of extracting every entry of an archive.
///
/// Entries are independent: one failing never stops the others, so an
/// outcome can carry both extracted bytes and failures.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// Sum of the uncompressed sizes of every entry.
    pub total_bytes: u64,
    /// Bytes actually written to disk.
    pub extracted_bytes: u64,
    pub entries: usize,
    pub failures: Vec<EntryFailure>,
}
impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(self)` if every entry was extracted, otherwise a
    /// [`PartialExtraction`](ErrorKind::PartialExtraction) error caused by
    /// the first recorded failure.
    ///
    /// Inspect [`failures`](Self::failures) first if every failure matters.
    pub fn into_result(mut self) -> Result<Self> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        let failed = self.failures.len();
        let first = self.failures.swap_remove(0);
        Err(first.error.raise(ErrorKind::PartialExtraction { failed, entries: self.entries }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(path: &str) -> EntryFailure {
        EntryFailure { path: path.to_string(), error: exn::Exn::from(ErrorKind::InvalidPath(path.to_string())) }
    }

    #[test]
    fn test_success() {
        let outcome = ExtractionOutcome { total_bytes: 10, extracted_bytes: 10, entries: 2, failures: vec![] };
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result().unwrap().extracted_bytes, 10);
    }

    #[test]
    fn test_failure_surfaces_partial_extraction() {
        let outcome = ExtractionOutcome {
            total_bytes: 10,
            extracted_bytes: 4,
            entries: 3,
            failures: vec![failure("../a"), failure("../b")],
        };
        assert!(!outcome.is_success());
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(&*err, ErrorKind::PartialExtraction { failed: 2, entries: 3 }));
    }
}
