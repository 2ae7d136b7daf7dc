// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport bindings: one logical backend call per invocation.
//!
//! A [`Transport`] performs a single list call and reports how many
//! response bytes it produced. Each binding bounds its own call with
//! [`REQUEST_TIMEOUT`]; the timer is dropped together with the call
//! future, so nothing outlives a call whatever its outcome.
//!
//! Both bindings issue the same logical request (`limit`, `offset = 0`,
//! `payload_kb`) so their numbers are comparable.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use reqwest::Url;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};

use wirebench_core::proto::todo_service_client::TodoServiceClient;
use wirebench_core::proto::ListTodosRequest;
use wirebench_core::{BenchConfig, ListLimit, Mode, PayloadKb};

/// Per-call deadline applied by every binding.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single call failed. Recorded as data, never propagated.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gRPC error: {0}")]
    Grpc(Box<tonic::Status>),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid gRPC endpoint: {0}")]
    Endpoint(#[from] tonic::transport::Error),

    #[error("{0}")]
    Other(String),
}

impl From<tonic::Status> for TransportError {
    fn from(status: tonic::Status) -> Self {
        TransportError::Grpc(Box::new(status))
    }
}

/// A binding that performs exactly one logical call against the backend.
///
/// Implementations must be safe to call from many workers at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one call, returning the response size in bytes.
    async fn call(&self) -> Result<usize, TransportError>;
}

/// Bound `call` by `timeout`, turning expiry into [`TransportError::Timeout`].
async fn with_timeout<F>(timeout: Duration, call: F) -> Result<usize, TransportError>
where
    F: Future<Output = Result<usize, TransportError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| TransportError::Timeout(timeout))?
}

/// Build `<base>/todos?limit=<limit>&offset=0&payload_kb=<kb>`.
///
/// The base must be an absolute `http` or `https` URL. Trailing slashes on
/// its path are dropped before `/todos` is appended; unrelated query
/// parameters on the base are kept.
pub fn build_rest_url(base: &str, limit: i32, payload_kb: i32) -> Result<Url, TransportError> {
    let invalid = |reason: &str| TransportError::InvalidUrl {
        url: base.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("base must include an http or https scheme"));
    }

    let path = format!("{}/todos", url.path().trim_end_matches('/'));
    url.set_path(&path);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !matches!(k.as_ref(), "limit" | "offset" | "payload_kb"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", "0")
        .append_pair("payload_kb", &payload_kb.to_string());

    Ok(url)
}

/// GET against the REST list endpoint; measures the raw body length.
///
/// Only `200 OK` counts as success, other 2xx codes included.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl RestTransport {
    /// Create a REST binding. The URL is built once up front.
    pub fn new(base: &str, limit: ListLimit, payload_kb: PayloadKb) -> Result<Self, TransportError> {
        let url = build_rest_url(base, limit.value(), payload_kb.value())?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Target URL of every call.
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch(&self) -> Result<usize, TransportError> {
        let resp = self.client.get(self.url.clone()).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(TransportError::Status(status));
        }

        let body = resp.bytes().await?;
        Ok(body.len())
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn call(&self) -> Result<usize, TransportError> {
        with_timeout(self.timeout, self.fetch()).await
    }
}

/// Typed `ListTodos` call over gRPC.
///
/// The reported size is the length of the decoded response re-encoded
/// with protobuf, not the number of bytes read off the wire: tonic hands
/// back decoded messages only. Framing and compression are not counted.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: TodoServiceClient<Channel>,
    request: ListTodosRequest,
    timeout: Duration,
}

impl GrpcTransport {
    /// Create a gRPC binding. `target` may be `host:port` or a full
    /// `http://host:port` URI. The connection is established lazily on the
    /// first call and shared by all clones.
    pub fn new(target: &str, limit: ListLimit, payload_kb: PayloadKb) -> Result<Self, TransportError> {
        let uri = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{}", target)
        };

        let channel = Endpoint::from_shared(uri)?
            .connect_timeout(REQUEST_TIMEOUT)
            .connect_lazy();

        Ok(Self {
            client: TodoServiceClient::new(channel),
            request: ListTodosRequest {
                limit: limit.value(),
                offset: 0,
                payload_kb: payload_kb.value(),
            },
            timeout: REQUEST_TIMEOUT,
        })
    }

    async fn fetch(&self) -> Result<usize, TransportError> {
        // Channel clones share one connection pool.
        let mut client = self.client.clone();
        let resp = client.list_todos(self.request.clone()).await?.into_inner();
        Ok(resp.encode_to_vec().len())
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn call(&self) -> Result<usize, TransportError> {
        with_timeout(self.timeout, self.fetch()).await
    }
}

/// Build the binding selected by `config.mode`.
pub fn for_config(config: &BenchConfig) -> Result<Arc<dyn Transport>, TransportError> {
    let transport: Arc<dyn Transport> = match config.mode {
        Mode::Rest => {
            let rest = RestTransport::new(&config.base_url, config.limit, config.payload_kb)?;
            tracing::debug!(url = %rest.url(), "REST target");
            Arc::new(rest)
        }
        Mode::Grpc => Arc::new(GrpcTransport::new(
            &config.grpc_target,
            config.limit,
            config.payload_kb,
        )?),
    };
    Ok(transport)
}

/// Adapts an async closure into a [`Transport`].
///
/// The closure is bounded by [`REQUEST_TIMEOUT`] unless overridden.
pub struct FnTransport<F> {
    call: F,
    timeout: Duration,
}

impl<F, Fut> FnTransport<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<usize, TransportError>> + Send,
{
    pub fn new(call: F) -> Self {
        Self {
            call,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Shorthand for [`FnTransport::new`].
pub fn from_fn<F, Fut>(call: F) -> FnTransport<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<usize, TransportError>> + Send,
{
    FnTransport::new(call)
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<usize, TransportError>> + Send,
{
    async fn call(&self) -> Result<usize, TransportError> {
        with_timeout(self.timeout, (self.call)()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rest_url() {
        let url = build_rest_url("http://localhost:8080", 100, 32).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/todos?limit=100&offset=0&payload_kb=32"
        );
    }

    #[test]
    fn test_build_rest_url_trims_trailing_slashes() {
        let url = build_rest_url("https://api.example.com/v1//", 0, 0).unwrap();
        assert_eq!(url.path(), "/v1/todos");
        assert_eq!(url.query(), Some("limit=0&offset=0&payload_kb=0"));
    }

    #[test]
    fn test_build_rest_url_replaces_existing_params() {
        let url = build_rest_url("http://h:1/?offset=9&trace=1", 5, 1).unwrap();
        assert_eq!(url.query(), Some("trace=1&limit=5&offset=0&payload_kb=1"));
    }

    #[test]
    fn test_build_rest_url_requires_scheme() {
        assert!(matches!(
            build_rest_url("localhost:8080", 1, 1),
            Err(TransportError::InvalidUrl { .. })
        ));
        assert!(build_rest_url("/todos", 1, 1).is_err());
        assert!(build_rest_url("ftp://host", 1, 1).is_err());
    }

    #[tokio::test]
    async fn test_fn_transport_passes_through() {
        let transport = from_fn(|| async { Ok(42) });
        assert_eq!(transport.call().await.unwrap(), 42);

        let failing = from_fn(|| async { Err(TransportError::Other("boom".into())) });
        assert!(matches!(failing.call().await, Err(TransportError::Other(_))));
    }

    #[tokio::test]
    async fn test_fn_transport_timeout() {
        let transport = from_fn(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(1)
        })
        .timeout(Duration::from_millis(10));

        assert!(matches!(
            transport.call().await,
            Err(TransportError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_rest_transport_unreachable_is_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let transport = RestTransport::new(
            "http://127.0.0.1:9",
            ListLimit::new(1).unwrap(),
            PayloadKb::new(0).unwrap(),
        )
        .unwrap();
        assert!(transport.call().await.is_err());
    }

    #[tokio::test]
    async fn test_grpc_transport_rejects_bad_target() {
        let result = GrpcTransport::new(
            "http://bad host",
            ListLimit::new(1).unwrap(),
            PayloadKb::new(0).unwrap(),
        );
        assert!(matches!(result, Err(TransportError::Endpoint(_))));
    }
}
