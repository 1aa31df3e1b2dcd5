//! HTTP client for the site's own JSON API.
//!
//! Plain HTTP/1.1 over a fresh TCP connection per request, bounded by a
//! single timeout covering connect, request and body.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const ANALYTICS_PATH: &str = "/api/analytics";
pub const CHANGELOG_PATH: &str = "/api/changelog";
pub const VERSION_PATH: &str = "/api/version";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Failures that never reached a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Connect(_) | ClientError::Http(_))
    }
}

/// Client for `GET` requests against the JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// `host:port` of the API server.
    address: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Fetch `path` and decode its JSON body.
    ///
    /// Non-2xx answers are errors even when they carry a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        match tokio::time::timeout(self.timeout, self.fetch(path)).await {
            Ok(Ok(body)) => Ok(serde_json::from_slice(&body)?),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                debug!(address = %self.address, %path, "api request timed out");
                Err(ClientError::Timeout)
            }
        }
    }

    async fn fetch(&self, path: &str) -> Result<Bytes, ClientError> {
        let stream = tokio::net::TcpStream::connect(&self.address).await?;
        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(path)
            .header("host", &self.address)
            .header("accept", "application/json")
            .header("user-agent", "streamsync-site/0.1")
            .body(Empty::<Bytes>::new())?;

        let resp = sender.send_request(req).await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(%status, %path, "api answered non-2xx");
            return Err(ClientError::Status(status));
        }
        Ok(resp.into_body().collect().await?.to_bytes())
    }
}
