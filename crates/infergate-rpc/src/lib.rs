//! Backend gRPC surface for infergate.
//!
//! - [`proto`]: message types for the `completion`, `chat` and
//!   `embeddings` backend services
//! - [`client`]: a tonic client for those services
//! - [`backend`]: the [`InferenceBackend`] / [`BackendConnector`] ports
//!   and their gRPC implementation

#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod client;
pub mod error;
pub mod proto;

pub use backend::{
    BackendConnector, GrpcBackend, GrpcConnector, InferenceBackend, ResponseStream, backend_uri,
};
pub use client::RpcClient;
pub use error::RpcError;
pub use tonic::Code;
