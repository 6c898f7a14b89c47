//! Concurrent zip archive extraction.
//!
//! Every entry of an archive is extracted by its own blocking task, with the
//! number of tasks in flight capped by [`Extractor`]. Entries fail
//! independently: a single unwritable file is reported in the
//! [`ExtractionOutcome`] while every other entry still lands on disk.
//!
//! ```no_run
//! use envkit_archive::Extractor;
//! use envkit_progress::NoProgress;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = Extractor::default()
//!     .extract(Path::new("openjdk-21.zip"), Path::new("/opt/jdk"), Arc::new(NoProgress))
//!     .await?;
//! for failure in &outcome.failures {
//!     eprintln!("{}: {}", failure.path, *failure.error);
//! }
//! # Ok(())
//! # }
//! ```

mod entry;
pub mod error;
mod extract;
mod outcome;
mod path;

pub use crate::entry::ArchiveEntry;
pub use crate::extract::{Extractor, list_entries};
pub use crate::outcome::{EntryFailure, ExtractionOutcome};
pub use crate::path::validate as validate_entry_path;
