//! Command Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("unable to set up HTTP client")]
    Client,
    #[display("unable to resolve download links")]
    Resolve { retryable: bool },
    #[display("no download named `{_0}` in the listing (try `envkit list`)")]
    UnknownArtifact(#[error(not(source))] String),
    #[display("invalid download link `{_0}`")]
    InvalidLink(#[error(not(source))] String),
    #[display("unable to download {url}")]
    Download { url: String, retryable: bool },
    #[display("unable to extract {}", _0.display())]
    Extract(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Resolve { retryable } | Self::Download { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
