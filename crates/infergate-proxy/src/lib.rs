//! OpenAI-compatible HTTP surface for infergate.
//!
//! This crate turns OpenAI API requests into backend RPC calls:
//!
//! - [`translate`]: wire-schema translation in both directions
//! - [`relay`]: server-stream to event-stream relay with stop-token handling
//! - [`orchestrator`]: `n` sequential unary calls for multi-choice requests
//! - [`server`]: the axum router, auth middleware, and serve loop
//!
//! # Architecture
//!
//! Each HTTP request resolves its model through the registry port and dials
//! its own backend connection through the [`BackendConnector`] port. Nothing
//! is pooled; the connection is dropped with the request.
//!
//! [`BackendConnector`]: infergate_rpc::BackendConnector

#![deny(unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod relay;
pub mod server;
pub mod state;
pub mod translate;

pub use auth::{ANONYMOUS, Identity};
pub use error::{ApiJson, ErrorBody, HttpError, backend_error};
pub use server::{create_router, serve};
pub use state::{AppState, GatewayContext};
