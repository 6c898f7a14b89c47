//! HTTP listing source backed by `reqwest`.

use crate::error::{ErrorKind, Result};
use crate::source::ListingSource;
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// Fetches listing pages over HTTP(S) with a single GET request.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}
impl HttpSource {
    /// Wrap an existing client (so connection pools and user agent are
    /// shared with downloads).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}
impl Default for HttpSource {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl ListingSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(status, body_size))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());
        if !status.is_success() {
            exn::bail!(ErrorKind::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }
        let body = response.bytes().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        tracing::Span::current().record("body_size", body.len());
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers exactly one request with `status` and `body`, returning the
    /// URL to request.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            let head = format!("HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n", body.len());
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/archive/")
    }

    fn source() -> HttpSource {
        HttpSource::new(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let url = serve_once("200 OK", "<table><tbody></tbody></table>").await;
        assert_eq!(source().fetch(&url).await.unwrap(), b"<table><tbody></tbody></table>");
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let url = serve_once("503 Service Unavailable", "busy").await;
        let err = source().fetch(&url).await.unwrap_err();
        assert_eq!(*err, ErrorKind::HttpStatus { url: url.clone(), status: 503 });
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let url = serve_once("404 Not Found", "").await;
        let err = source().fetch(&url).await.unwrap_err();
        assert_eq!(*err, ErrorKind::HttpStatus { url: url.clone(), status: 404 });
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_refused_connection() {
        // Bind then drop, so nothing is listening on the port.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let url = format!("http://{addr}/");
        let err = source().fetch(&url).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Network(url));
        assert!(err.is_retryable());
    }
}
