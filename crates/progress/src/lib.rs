//! Byte progress reporting.
//!
//! Long-running operations (downloads, archive extraction) report through
//! the [`Progress`] trait so that libraries never draw to the terminal
//! themselves. The binary hands in an [`indicatif::ProgressBar`]; tests and
//! quiet runs hand in [`NoProgress`].

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::{Arc, LazyLock};

const BYTES_TEMPLATE: &str =
    "{prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const PROGRESS_CHARS: &str = "=> ";

static BYTES_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::with_template(BYTES_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS)
});

/// Receives byte counts from a long-running operation.
///
/// Implementations are shared between worker threads, so every method takes
/// `&self`.
pub trait Progress: Send + Sync {
    /// The operation is about to process `total` bytes.
    fn start(&self, total: u64);
    /// `bytes` more bytes have been processed.
    fn advance(&self, bytes: u64);
    fn finish(&self);
}

pub type ProgressHandle = Arc<dyn Progress>;

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;
impl Progress for NoProgress {
    fn start(&self, _total: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

impl Progress for ProgressBar {
    fn start(&self, total: u64) {
        self.set_length(total);
        self.set_position(0);
    }

    fn advance(&self, bytes: u64) {
        self.inc(bytes);
    }

    fn finish(&self) {
        ProgressBar::finish(self);
    }
}

/// A progress bar that counts bytes, labelled with `prefix`.
///
/// The length is set later by [`Progress::start`].
pub fn bytes_bar(prefix: impl Into<Cow<'static, str>>) -> ProgressBar {
    ProgressBar::new(0).with_style(BYTES_STYLE.clone()).with_prefix(prefix)
}

/// Reports every byte written through it.
pub struct ProgressWriter<W> {
    inner: W,
    progress: ProgressHandle,
    written: u64,
}
impl<W: Write> ProgressWriter<W> {
    pub fn new(inner: W, progress: ProgressHandle) -> Self {
        Self { inner, progress, written: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.written += written as u64;
        self.progress.advance(written as u64);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
