//! # Transport
//!
//! Resolves the `--socket` target once at the boundary into a [`ConnectionTarget`] and opens the
//! single connection an invocation is allowed to make.
//!
//! - `unix:///run/uwsgi/app.stats` connects to a stream socket and reads until the peer closes it.
//! - `http://127.0.0.1:1717/` issues one unauthenticated `GET`.
//!
//! Any other scheme is rejected before any I/O happens.

use crate::error::{
    CollectError,
    TransportError,
};
use reqwest::Client as HttpClient;
use std::{
    fmt,
    future::Future,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};
use tokio::{
    io::AsyncReadExt as _,
    net::UnixStream,
};
use url::Url;

pub const UNIX_PREFIX: &str = "unix://";
pub const HTTP_PREFIX: &str = "http://";

/// Where the vassal's stats server can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Unix(PathBuf),
    Http(Url),
}

impl FromStr for ConnectionTarget {
    type Err = CollectError;

    fn from_str(target: &str) -> Result<Self, Self::Err> {
        if let Some(path) = target.strip_prefix(UNIX_PREFIX) {
            if path.is_empty() {
                return Err(CollectError::configuration(target, "the socket path is empty"));
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }

        if target.starts_with(HTTP_PREFIX) {
            let url = Url::parse(target).map_err(|e| CollectError::configuration(target, e.to_string()))?;
            return Ok(Self::Http(url));
        }

        Err(CollectError::configuration(
            target,
            format!("expected a '{HTTP_PREFIX}' or '{UNIX_PREFIX}' prefix"),
        ))
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "{UNIX_PREFIX}{}", path.display()),
            Self::Http(url) => write!(f, "{url}"),
        }
    }
}

/// The raw bytes of one response together with a description of where they came from.
#[derive(Debug, Clone)]
pub struct StatsBody {
    pub bytes: Vec<u8>,
    pub origin: String,
}

/// An open connection whose body has not been read yet.
///
/// Consuming it with [`StatsStream::into_body`] drops the socket or response on every path,
/// including read failures.
#[derive(Debug)]
pub enum StatsStream {
    Unix { path: PathBuf, stream: UnixStream },
    Http { url: Url, response: reqwest::Response },
}

impl StatsStream {
    pub async fn into_body(self) -> Result<StatsBody, TransportError> {
        match self {
            Self::Unix { path, mut stream } => {
                let mut bytes = Vec::new();
                stream.read_to_end(&mut bytes).await?;
                Ok(StatsBody {
                    bytes,
                    origin: format!("unix socket {}", path.display()),
                })
            }
            Self::Http { url, response } => {
                let status = response.status();
                let bytes = response.bytes().await?.to_vec();
                Ok(StatsBody {
                    bytes,
                    origin: format!("{url} (HTTP {status})"),
                })
            }
        }
    }
}

/// Opens connections to a single [`ConnectionTarget`] with a bounded timeout.
#[derive(Debug, Clone)]
pub struct Transport {
    target: ConnectionTarget,
    timeout: Duration,
    http_client: HttpClient,
}

impl Transport {
    pub fn new(target: ConnectionTarget, timeout: Duration) -> Result<Self, CollectError> {
        // Proxy settings from the environment are ignored.
        let http_client = HttpClient::builder()
            .no_proxy()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollectError::connection(&target, e))?;

        Ok(Self {
            target,
            timeout,
            http_client,
        })
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Open the connection. Ownership of the stream passes to the caller.
    pub async fn open(&self) -> Result<StatsStream, CollectError> {
        match &self.target {
            ConnectionTarget::Unix(path) => {
                debug!(path = %path.display(), "Connecting to unix stats socket");
                let stream = self
                    .bounded(UnixStream::connect(path))
                    .await
                    .map_err(|e| CollectError::connection(&self.target, e))?;
                Ok(StatsStream::Unix {
                    path: path.clone(),
                    stream,
                })
            }
            ConnectionTarget::Http(url) => {
                debug!(%url, "Requesting stats over http");
                let response = self
                    .http_client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| CollectError::connection(&self.target, e))?;

                let status = response.status();
                if !status.is_success() {
                    warn!(%url, %status, "Stats endpoint answered with a non-success status, decoding anyway");
                }

                Ok(StatsStream::Http {
                    url: url.clone(),
                    response,
                })
            }
        }
    }

    /// Open the connection and read the whole body.
    pub async fn fetch(&self) -> Result<StatsBody, CollectError> {
        let stream = self.open().await?;
        let body = self
            .bounded(stream.into_body())
            .await
            .map_err(|e| CollectError::connection(&self.target, e))?;
        trace!(len = body.bytes.len(), origin = %body.origin, "Read stats body");
        Ok(body)
    }

    async fn bounded<T, E>(&self, fut: impl Future<Output = Result<T, E>>) -> Result<T, TransportError>
    where
        E: Into<TransportError>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}
