// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! wirebench Backend Library
//!
//! Serves one shared todo service over two transports at once:
//! JSON/HTTP via Axum and protobuf/gRPC via tonic. Both servers stop
//! together on a shutdown signal or when either of them fails.

pub mod grpc;
pub mod http;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;

use wirebench_core::{ServerConfig, TodoService};

pub use grpc::TodoGrpc;

/// Errors raised while running the backend.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {transport} listener on {addr}: {source}")]
    Bind {
        transport: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("REST server error: {0}")]
    Rest(#[source] std::io::Error),

    #[error("gRPC server error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Both listeners bound and ready to serve.
#[derive(Debug)]
pub struct Backend {
    rest: TcpListener,
    grpc: TcpListener,
    service: TodoService,
    shutdown_timeout: Duration,
}

impl Backend {
    /// Bind the REST and gRPC listeners. Binding happens up front so
    /// address conflicts are reported before anything is served.
    pub async fn bind(config: &ServerConfig, service: TodoService) -> Result<Self, ServerError> {
        let rest = bind_listener("rest", config.rest_addr).await?;
        let grpc = bind_listener("grpc", config.grpc_addr).await?;

        Ok(Self {
            rest,
            grpc,
            service,
            shutdown_timeout: config.shutdown_timeout,
        })
    }

    /// Address the REST listener is bound to.
    pub fn rest_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.rest.local_addr()?)
    }

    /// Address the gRPC listener is bound to.
    pub fn grpc_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.grpc.local_addr()?)
    }

    /// Serve until `signal` resolves or one of the servers fails, then
    /// shut both down gracefully within the configured timeout.
    pub async fn run_until<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks: JoinSet<Result<(), ServerError>> = JoinSet::new();

        let app = http::router(self.service.clone());
        let rest_stop = stop_rx.clone();
        let rest = self.rest;
        tasks.spawn(async move {
            axum::serve(rest, app)
                .with_graceful_shutdown(stopped(rest_stop))
                .await
                .map_err(ServerError::Rest)
        });

        let grpc_service = TodoGrpc::new(self.service).into_server();
        let grpc_stop = stop_rx;
        let incoming = TcpListenerStream::new(self.grpc);
        tasks.spawn(async move {
            tonic::transport::Server::builder()
                .add_service(grpc_service)
                .serve_with_incoming_shutdown(incoming, stopped(grpc_stop))
                .await
                .map_err(ServerError::Grpc)
        });

        let mut first_error = None;

        tokio::select! {
            _ = signal => {
                tracing::info!("Shutdown signal received");
            }
            Some(joined) = tasks.join_next() => {
                match flatten(joined) {
                    Ok(()) => tracing::warn!("A server stopped unexpectedly"),
                    Err(e) => {
                        tracing::error!(error = %e, "Server error");
                        first_error = Some(e);
                    }
                }
            }
        }

        let _ = stop_tx.send(true);

        let drain = async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = flatten(joined) {
                    tracing::error!(error = %e, "Server error during shutdown");
                    first_error.get_or_insert(e);
                }
            }
        };

        if tokio::time::timeout(self.shutdown_timeout, drain).await.is_err() {
            tracing::warn!(
                timeout_ms = self.shutdown_timeout.as_millis() as u64,
                "Graceful shutdown timed out, aborting servers"
            );
            tasks.abort_all();
        }

        tracing::info!("Shutdown complete");
        first_error.map_or(Ok(()), Err)
    }
}

/// Run the backend with a fresh store until Ctrl+C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let backend = Backend::bind(&config, TodoService::new()).await?;

    tracing::info!(addr = %backend.rest_addr()?, "REST listening");
    tracing::info!(addr = %backend.grpc_addr()?, "gRPC listening");

    backend.run_until(shutdown_signal()).await
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn bind_listener(transport: &'static str, addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            transport,
            addr,
            source,
        })
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

fn flatten(
    joined: Result<Result<(), ServerError>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    joined?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn local_config() -> ServerConfig {
        ServerConfig {
            rest_addr: "127.0.0.1:0".parse().unwrap(),
            grpc_addr: "127.0.0.1:0".parse().unwrap(),
            shutdown_timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn test_bind_ephemeral_ports() {
        let backend = Backend::bind(&local_config(), TodoService::new())
            .await
            .unwrap();
        assert_ne!(backend.rest_addr().unwrap().port(), 0);
        assert_ne!(backend.grpc_addr().unwrap().port(), 0);
        assert_ne!(backend.rest_addr().unwrap(), backend.grpc_addr().unwrap());
    }

    #[tokio::test]
    async fn test_bind_conflict_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            rest_addr: taken.local_addr().unwrap(),
            ..local_config()
        };
        let err = Backend::bind(&config, TodoService::new()).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { transport: "rest", .. }));
    }

    #[tokio::test]
    async fn test_run_until_stops_on_signal() {
        let backend = Backend::bind(&local_config(), TodoService::new())
            .await
            .unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(backend.run_until(async {
            let _ = rx.await;
        }));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
