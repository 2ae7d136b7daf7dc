//! wirebench Core Library
//!
//! Domain library shared by the wirebench server and benchmark harness.
//! Provides the todo model, store and service, validated configuration,
//! typed errors, and the generated protobuf/gRPC types.

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod types;

/// Generated protobuf messages and gRPC client/server stubs for the
/// `todo` package.
pub mod proto {
    tonic::include_proto!("todo");
}

// Re-export commonly used types
pub use config::{BenchConfig, BenchOverrides, Config, ConfigLoader, ServerConfig, ServerOverrides};
pub use error::{HardValidationError, TodoError, WireError, WireResult};
pub use model::{filler_payload, Todo};
pub use service::TodoService;
pub use store::Store;
pub use types::{Concurrency, ListLimit, Mode, PayloadKb, RequestCount};
