//! Streaming artifact downloads.
//!
//! Artifacts are written next to their destination as `<name>.part` and only
//! renamed into place once the whole body has arrived, so an interrupted
//! download never looks like a finished one.

pub mod error;

use crate::error::{ErrorKind, Result};
use envkit_progress::Progress;
use exn::{OptionExt, ResultExt};
use futures::StreamExt;
use reqwest::{Client, Url};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tracing::instrument;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Build the HTTP client shared by listing fetches and downloads.
pub fn client(user_agent: &str) -> Result<Client> {
    Client::builder().user_agent(user_agent).build().or_raise(|| ErrorKind::Client)
}

/// Where a download is written before it is complete.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

/// Download `url` to `destination`, returning the number of bytes written.
///
/// A single GET request is made; there are no retries and no checksum
/// verification. `file://` URLs are copied from the local filesystem.
/// Parent directories of `destination` are created as needed, and an
/// existing file at `destination` is replaced.
///
/// # Errors
///
/// - [`InvalidUrl`](ErrorKind::InvalidUrl) if `url` doesn't parse.
/// - [`Network`](ErrorKind::Network) or [`HttpStatus`](ErrorKind::HttpStatus)
///   if the request fails or the body is interrupted.
/// - [`Io`](ErrorKind::Io) if the file can't be written.
#[instrument(skip(client, destination, progress), fields(destination = %destination.display(), bytes))]
pub async fn download(client: &Client, url: &str, destination: &Path, progress: &dyn Progress) -> Result<u64> {
    let parsed = Url::parse(url).or_raise(|| ErrorKind::InvalidUrl(url.to_string()))?;
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
    }
    let partial = partial_path(destination);
    let written = match parsed.scheme() {
        "file" => copy_local(&parsed, &partial, progress).await,
        _ => fetch_remote(client, parsed, &partial, progress).await,
    };
    let written = match written {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&partial).await;
            return Err(err);
        },
    };
    fs::rename(&partial, destination).await.or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
    progress.finish();
    tracing::Span::current().record("bytes", written);
    tracing::info!(bytes = written, "Downloaded {url}");
    Ok(written)
}

async fn fetch_remote(client: &Client, url: Url, partial: &Path, progress: &dyn Progress) -> Result<u64> {
    let response = client.get(url.clone()).send().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        exn::bail!(ErrorKind::HttpStatus { url: url.to_string(), status: status.as_u16() });
    }
    progress.start(response.content_length().unwrap_or(0));

    let file = File::create(partial).await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.or_raise(|| ErrorKind::Network(url.to_string()))?;
        writer.write_all(&chunk).await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
        written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }
    writer.flush().await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
    Ok(written)
}

async fn copy_local(url: &Url, partial: &Path, progress: &dyn Progress) -> Result<u64> {
    let source = url.to_file_path().ok().ok_or_raise(|| ErrorKind::InvalidUrl(url.to_string()))?;
    let mut reader = File::open(&source).await.or_raise(|| ErrorKind::Io(source.clone()))?;
    let size = reader.metadata().await.or_raise(|| ErrorKind::Io(source.clone()))?.len();
    progress.start(size);

    let file = File::create(partial).await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;
    loop {
        let read = reader.read(&mut buffer).await.or_raise(|| ErrorKind::Io(source.clone()))?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read]).await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
        written += read as u64;
        progress.advance(read as u64);
    }
    writer.flush().await.or_raise(|| ErrorKind::Io(partial.to_path_buf()))?;
    Ok(written)
}
