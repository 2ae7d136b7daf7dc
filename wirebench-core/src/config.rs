// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict validation.
//!
//! Both the server and the benchmark read the same file layout. Every
//! field has a default, so an absent file or an empty section is valid.
//! Command-line overrides are applied before validation, and any invalid
//! field results in a HardValidationError that prevents startup.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{HardValidationError, WireError, WireResult};
use crate::types::{Concurrency, ListLimit, Mode, PayloadKb, RequestCount};

/// Raw server configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawServerConfig {
    #[serde(default = "default_rest_addr")]
    rest_addr: String,
    #[serde(default = "default_grpc_addr")]
    grpc_addr: String,
    #[serde(default = "default_shutdown_timeout_ms")]
    shutdown_timeout_ms: u64,
}

fn default_rest_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_grpc_addr() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_shutdown_timeout_ms() -> u64 {
    5000
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: default_rest_addr(),
            grpc_addr: default_grpc_addr(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

/// Raw benchmark configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_base_url")]
    base: String,
    #[serde(default = "default_grpc_target")]
    grpc: String,
    #[serde(default = "default_requests")]
    n: i64,
    #[serde(default = "default_concurrency")]
    c: i64,
    #[serde(default = "default_payload_kb")]
    payload_kb: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default = "default_warmup")]
    warmup: i64,
}

fn default_mode() -> String {
    "rest".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_grpc_target() -> String {
    "localhost:9090".to_string()
}

fn default_requests() -> i64 {
    20000
}

fn default_concurrency() -> i64 {
    50
}

fn default_payload_kb() -> i64 {
    32
}

fn default_limit() -> i64 {
    100
}

fn default_warmup() -> i64 {
    1000
}

impl Default for RawBenchConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            base: default_base_url(),
            grpc: default_grpc_target(),
            n: default_requests(),
            c: default_concurrency(),
            payload_kb: default_payload_kb(),
            limit: default_limit(),
            warmup: default_warmup(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: RawServerConfig,
    #[serde(default)]
    bench: RawBenchConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub rest_addr: Option<String>,
    pub grpc_addr: Option<String>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct BenchOverrides {
    pub mode: Option<String>,
    pub base: Option<String>,
    pub grpc: Option<String>,
    pub n: Option<i64>,
    pub c: Option<i64>,
    pub payload_kb: Option<i64>,
    pub limit: Option<i64>,
    pub warmup: Option<i64>,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
    pub shutdown_timeout: Duration,
}

/// Validated benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mode: Mode,
    /// REST base URL, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// gRPC target, e.g. `localhost:9090`.
    pub grpc_target: String,
    pub requests: RequestCount,
    pub concurrency: Concurrency,
    pub payload_kb: PayloadKb,
    pub limit: ListLimit,
    /// Warm-up request budget; capped at `requests` when run.
    pub warmup: usize,
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub bench: BenchConfig,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> WireResult<Config> {
        let raw = Self::read_file(path.as_ref())?;
        Self::validate(raw)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> WireResult<Config> {
        let raw = Self::parse(content)?;
        Self::validate(raw)
    }

    /// Resolve configuration from an optional file plus command-line
    /// overrides. Without a file, defaults stand in for it.
    pub fn resolve(
        path: Option<&Path>,
        server: &ServerOverrides,
        bench: &BenchOverrides,
    ) -> WireResult<Config> {
        let mut raw = match path {
            Some(path) => Self::read_file(path)?,
            None => RawConfig::default(),
        };

        apply_server_overrides(&mut raw.server, server);
        apply_bench_overrides(&mut raw.bench, bench);

        Self::validate(raw)
    }

    fn read_file(path: &Path) -> WireResult<RawConfig> {
        if !path.exists() {
            return Err(WireError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| WireError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> WireResult<RawConfig> {
        // An empty document deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(RawConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| WireError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> WireResult<Config> {
        let server = Self::validate_server(raw.server)?;
        let bench = Self::validate_bench(raw.bench)?;
        Ok(Config { server, bench })
    }

    fn validate_server(raw: RawServerConfig) -> WireResult<ServerConfig> {
        let rest_addr = parse_socket_addr("rest_addr", &raw.rest_addr)?;
        let grpc_addr = parse_socket_addr("grpc_addr", &raw.grpc_addr)?;

        if rest_addr == grpc_addr && rest_addr.port() != 0 {
            return Err(HardValidationError::InvalidAddress {
                field: "grpc_addr",
                value: raw.grpc_addr,
                reason: "REST and gRPC must listen on different addresses".to_string(),
            }
            .into());
        }

        // Bounded so a stuck connection cannot hold the process forever.
        if raw.shutdown_timeout_ms == 0 || raw.shutdown_timeout_ms > 60_000 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "shutdown_timeout_ms",
                value: raw.shutdown_timeout_ms.to_string(),
                reason: "Must be between 1 and 60000".to_string(),
            }
            .into());
        }

        Ok(ServerConfig {
            rest_addr,
            grpc_addr,
            shutdown_timeout: Duration::from_millis(raw.shutdown_timeout_ms),
        })
    }

    fn validate_bench(raw: RawBenchConfig) -> WireResult<BenchConfig> {
        let mode: Mode = raw.mode.parse()?;
        let requests = RequestCount::new(raw.n)?;
        let concurrency = Concurrency::new(raw.c)?;
        let payload_kb = PayloadKb::new(raw.payload_kb)?;
        let limit = ListLimit::new(raw.limit)?;

        if raw.warmup < 0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "warmup",
                value: raw.warmup.to_string(),
                reason: "must be >= 0".to_string(),
            }
            .into());
        }

        if raw.base.trim().is_empty() {
            return Err(HardValidationError::InvalidAddress {
                field: "base",
                value: raw.base,
                reason: "REST base URL cannot be empty".to_string(),
            }
            .into());
        }

        if raw.grpc.trim().is_empty() {
            return Err(HardValidationError::InvalidAddress {
                field: "grpc",
                value: raw.grpc,
                reason: "gRPC address cannot be empty".to_string(),
            }
            .into());
        }

        Ok(BenchConfig {
            mode,
            base_url: raw.base,
            grpc_target: raw.grpc,
            requests,
            concurrency,
            payload_kb,
            limit,
            warmup: raw.warmup as usize,
        })
    }
}

fn apply_server_overrides(raw: &mut RawServerConfig, overrides: &ServerOverrides) {
    if let Some(addr) = &overrides.rest_addr {
        raw.rest_addr = addr.clone();
    }
    if let Some(addr) = &overrides.grpc_addr {
        raw.grpc_addr = addr.clone();
    }
}

fn apply_bench_overrides(raw: &mut RawBenchConfig, overrides: &BenchOverrides) {
    if let Some(mode) = &overrides.mode {
        raw.mode = mode.clone();
    }
    if let Some(base) = &overrides.base {
        raw.base = base.clone();
    }
    if let Some(grpc) = &overrides.grpc {
        raw.grpc = grpc.clone();
    }
    raw.n = overrides.n.unwrap_or(raw.n);
    raw.c = overrides.c.unwrap_or(raw.c);
    raw.payload_kb = overrides.payload_kb.unwrap_or(raw.payload_kb);
    raw.limit = overrides.limit.unwrap_or(raw.limit);
    raw.warmup = overrides.warmup.unwrap_or(raw.warmup);
}

fn parse_socket_addr(field: &'static str, value: &str) -> Result<SocketAddr, HardValidationError> {
    value
        .parse()
        .map_err(|e: std::net::AddrParseError| HardValidationError::InvalidAddress {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
