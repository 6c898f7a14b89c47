//! Concurrent extraction of zip archives.

use crate::entry::{self, ArchiveEntry};
use crate::error::{ErrorKind, Result};
use crate::outcome::{EntryFailure, ExtractionOutcome};
use crate::path;
use envkit_progress::{ProgressHandle, ProgressWriter};
use exn::ResultExt;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::instrument;
use zip::ZipArchive;

type Reader = ZipArchive<BufReader<File>>;

fn open(source: &Path) -> Result<Reader> {
    let file = File::open(source).or_raise(|| ErrorKind::Open(source.to_path_buf()))?;
    ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::Open(source.to_path_buf()))
}

/// Opened archives waiting to be reused.
///
/// Opening an archive parses its whole central directory, so workers borrow
/// an already-open reader instead of reopening per entry. At most one reader
/// exists per concurrently running worker.
struct ReaderPool {
    source: PathBuf,
    idle: Mutex<Vec<Reader>>,
}
impl ReaderPool {
    fn new(source: PathBuf, reader: Reader) -> Self {
        Self { source, idle: Mutex::new(vec![reader]) }
    }

    fn checkout(&self) -> Result<Reader> {
        let idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
        match idle {
            Some(reader) => Ok(reader),
            None => open(&self.source),
        }
    }

    fn checkin(&self, reader: Reader) {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).push(reader);
    }
}

async fn open_and_enumerate(source: PathBuf) -> Result<(Reader, Vec<ArchiveEntry>)> {
    let opening = source.clone();
    tokio::task::spawn_blocking(move || -> Result<_> {
        let mut reader = open(&opening)?;
        let entries = entry::enumerate(&mut reader).or_raise(|| ErrorKind::Open(opening.clone()))?;
        Ok((reader, entries))
    })
    .await
    .or_raise(|| ErrorKind::Open(source.clone()))?
}

/// Read the entry list of the zip archive at `source` without extracting
/// anything.
#[instrument(skip(source), fields(source = %source.display()))]
pub async fn list_entries(source: &Path) -> Result<Vec<ArchiveEntry>> {
    Ok(open_and_enumerate(source.to_path_buf()).await?.1)
}

/// State shared by every extraction worker.
struct Shared {
    pool: ReaderPool,
    destination: PathBuf,
    progress: ProgressHandle,
    extracted: AtomicU64,
}
impl Shared {
    /// Extract a single entry, returning the number of bytes written.
    fn extract_entry(&self, entry: &ArchiveEntry) -> Result<u64> {
        let target = self.destination.join(path::validate(&entry.name)?);
        if entry.is_dir {
            fs::create_dir_all(&target).or_raise(|| ErrorKind::CreateDirectory(target.clone()))?;
            return Ok(0);
        }
        // Sibling entries race to create shared ancestors; `create_dir_all`
        // treats an already existing directory as success.
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::CreateDirectory(parent.to_path_buf()))?;
        }
        let mut reader = self.pool.checkout()?;
        let copied = self.copy_entry(&mut reader, entry, &target);
        self.pool.checkin(reader);
        let copied = copied?;
        self.extracted.fetch_add(copied, Ordering::Relaxed);
        Ok(copied)
    }

    fn copy_entry(&self, reader: &mut Reader, entry: &ArchiveEntry, target: &Path) -> Result<u64> {
        let mut contents = reader.by_index(entry.index).or_raise(|| ErrorKind::ReadEntry(entry.name.clone()))?;
        let file = open_options(entry.mode).open(target).or_raise(|| ErrorKind::CreateFile(target.to_path_buf()))?;
        let mut writer = ProgressWriter::new(BufWriter::new(file), self.progress.clone());
        let copied = io::copy(&mut contents, &mut writer).or_raise(|| ErrorKind::Copy(target.to_path_buf()))?;
        writer.flush().or_raise(|| ErrorKind::Copy(target.to_path_buf()))?;
        Ok(copied)
    }
}

fn open_options(mode: Option<u32>) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;
    options
}

/// Extracts zip archives with a bounded number of concurrent workers.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    concurrency: NonZeroUsize,
}
impl Extractor {
    pub fn new(concurrency: NonZeroUsize) -> Self {
        Self { concurrency }
    }

    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    /// Extract every entry of the zip archive at `source` into `destination`.
    ///
    /// Each entry is extracted by its own blocking task; at most
    /// [`concurrency`](Self::concurrency) run at once and they finish in no
    /// particular order. A failing entry is recorded in the returned
    /// [`ExtractionOutcome`] and never stops its siblings, and entries that
    /// were written stay on disk. Use [`ExtractionOutcome::into_result`] to
    /// turn recorded failures into an error.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Open`] if `source` can't be opened or isn't a zip
    /// archive. Nothing is extracted in that case.
    #[instrument(skip(self, source, destination, progress), fields(source = %source.display(), destination = %destination.display(), entries, total_bytes))]
    pub async fn extract(&self, source: &Path, destination: &Path, progress: ProgressHandle) -> Result<ExtractionOutcome> {
        let (reader, entries) = open_and_enumerate(source.to_path_buf()).await?;

        let entry_count = entries.len();
        let total_bytes: u64 = entries.iter().map(|entry| entry.size).sum();
        tracing::Span::current().record("entries", entry_count).record("total_bytes", total_bytes);
        progress.start(total_bytes);

        let shared = Arc::new(Shared {
            pool: ReaderPool::new(source.to_path_buf(), reader),
            destination: destination.to_path_buf(),
            progress: progress.clone(),
            extracted: AtomicU64::new(0),
        });
        let spawn = |entry: ArchiveEntry| {
            let shared = Arc::clone(&shared);
            async move {
                let name = entry.name.clone();
                let joined = tokio::task::spawn_blocking(move || shared.extract_entry(&entry)).await;
                (name, joined)
            }
        };

        let mut pending = entries.into_iter();
        let mut running = FuturesUnordered::new();
        running.extend(pending.by_ref().take(self.concurrency.get()).map(&spawn));
        let mut failures = Vec::new();
        while let Some((name, joined)) = running.next().await {
            match joined.or_raise(|| ErrorKind::Worker(name.clone())).and_then(|result| result) {
                Ok(bytes) => tracing::trace!(entry = %name, bytes, "Extracted entry"),
                Err(error) => {
                    tracing::warn!(entry = %name, error = ?error, "Failed to extract entry");
                    failures.push(EntryFailure { path: name, error });
                },
            }
            if let Some(entry) = pending.next() {
                running.push(spawn(entry));
            }
        }
        progress.finish();

        let outcome = ExtractionOutcome {
            total_bytes,
            extracted_bytes: shared.extracted.load(Ordering::SeqCst),
            entries: entry_count,
            failures,
        };
        tracing::debug!(
            extracted_bytes = outcome.extracted_bytes,
            failures = outcome.failures.len(),
            "Extraction finished"
        );
        Ok(outcome)
    }
}
impl Default for Extractor {
    fn default() -> Self {
        Self::new(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }
}
