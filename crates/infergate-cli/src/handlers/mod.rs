//! Command handlers.
//!
//! Each handler receives already-composed dependencies from
//! [`crate::bootstrap`], does its work, and writes results to stdout.

pub mod keys;
pub mod models;
pub mod serve;
