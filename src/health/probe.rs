//! Single-endpoint reachability probe.
//!
//! # Responsibilities
//! - Send one HEAD request to `http://{address}` with the endpoint's virtual host;
//!   a path in the address is kept, otherwise `/`
//! - Bound the whole exchange (connect, handshake, response head) by a timeout
//! - Report transport-level failures as a failed `ProbeResult`
//!
//! # Design Decisions
//! - Only "did the exchange complete" matters; status code and body are ignored
//! - A fresh TCP connection per probe, never pooled
//! - The connection is driven inside the probe future, so dropping the probe
//!   (timeout, race cancelled) tears everything down
//! - No retries; retry policy belongs to the health machine

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Empty;
use hyper::client::conn::http1;
use hyper::header::{HOST, USER_AGENT};
use hyper::http::uri::PathAndQuery;
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;
use url::Url;

use crate::health::target::Endpoint;

const PROBE_USER_AGENT: &str = concat!("netguard/", env!("CARGO_PKG_VERSION"));

/// Result of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub success: bool,
    pub message: String,
}

impl ProbeResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A bounded-time reachability test.
///
/// Implementations must resolve within `timeout` and must not leave
/// background work running once the returned future completes or is dropped.
pub trait Probe: Clone + Send + Sync + 'static {
    fn probe(
        &self,
        endpoint: &Endpoint,
        timeout: Duration,
    ) -> impl Future<Output = ProbeResult> + Send;
}

#[derive(Debug, Error)]
enum ProbeError {
    #[error("create request fail: invalid address '{0}'")]
    InvalidAddress(String),

    #[error("create request fail: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("send request fail: connect {target}: {source}")]
    Connect {
        target: String,
        source: std::io::Error,
    },

    #[error("send request fail: {0}")]
    Http(#[from] hyper::Error),

    #[error("send request fail: timed out after {0:?}")]
    Timeout(Duration),
}

/// HTTP HEAD probe, optionally through a forward proxy.
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    proxy: Option<Url>,
}

impl HttpProbe {
    /// Probe endpoints directly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe through `proxy` when set (plain `http://` forward proxy).
    pub fn with_proxy(proxy: Option<Url>) -> Self {
        Self { proxy }
    }

    async fn head(&self, endpoint: &Endpoint) -> Result<(), ProbeError> {
        let invalid = || ProbeError::InvalidAddress(endpoint.address.clone());

        let parsed: Uri = format!("http://{}", endpoint.address)
            .parse()
            .map_err(|_| invalid())?;
        let authority = parsed.authority().ok_or_else(invalid)?.clone();
        let path = parsed
            .path_and_query()
            .map(PathAndQuery::as_str)
            .filter(|p| !p.is_empty())
            .unwrap_or("/");

        // Direct: dial the address, origin-form target.
        // Proxied: dial the proxy, absolute-form target.
        let (dial_host, dial_port, request_uri) = match &self.proxy {
            Some(proxy) => (
                proxy.host_str().ok_or_else(invalid)?.to_string(),
                proxy.port_or_known_default().unwrap_or(80),
                format!("http://{}{}", authority, path)
                    .parse::<Uri>()
                    .map_err(|_| invalid())?,
            ),
            None => (
                authority.host().to_string(),
                authority.port_u16().unwrap_or(80),
                path.parse::<Uri>().map_err(|_| invalid())?,
            ),
        };
        let dial_host = dial_host.trim_start_matches('[').trim_end_matches(']');

        let stream = TcpStream::connect((dial_host, dial_port))
            .await
            .map_err(|source| ProbeError::Connect {
                target: format!("{}:{}", dial_host, dial_port),
                source,
            })?;

        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await?;

        let request = Request::builder()
            .method(Method::HEAD)
            .uri(request_uri)
            .header(HOST, endpoint.virtual_host.as_str())
            .header(USER_AGENT, PROBE_USER_AGENT)
            .body(Empty::<Bytes>::new())?;

        let response = sender.send_request(request);
        tokio::pin!(conn);
        tokio::pin!(response);

        tokio::select! {
            biased;
            result = &mut response => {
                result?;
            }
            closed = &mut conn => {
                // Connection ended first; a response head may still have arrived
                // (e.g. the server reset right after answering).
                match closed {
                    Ok(()) => {
                        response.await?;
                    }
                    Err(e) => {
                        response.await.map_err(|_| ProbeError::Http(e))?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Probe for HttpProbe {
    async fn probe(&self, endpoint: &Endpoint, timeout: Duration) -> ProbeResult {
        tracing::debug!(endpoint = %endpoint, timeout = ?timeout, "Probing endpoint");

        let outcome = match time::timeout(timeout, self.head(endpoint)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(timeout)),
        };

        match outcome {
            Ok(()) => ProbeResult::success(format!("{} reachable", endpoint)),
            Err(e) => {
                tracing::debug!(endpoint = %endpoint, error = %e, "Probe failed");
                ProbeResult::failure(format!("{}: {}", endpoint, e))
            }
        }
    }
}
