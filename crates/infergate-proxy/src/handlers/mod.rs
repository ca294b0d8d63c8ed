//! HTTP request handlers for the gateway.
//!
//! Each submodule handles one OpenAI API area. Handlers parse and
//! translate first, then resolve and dial the backend, so invalid input
//! never costs a backend connection.

pub mod chat;
pub mod completions;
pub mod embeddings;
pub mod health;
pub mod models;

