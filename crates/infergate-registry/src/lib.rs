//! Model registry sources for infergate.
//!
//! Model definitions live in a directory of `*.toml` files. [`loader`]
//! turns that directory into a [`ModelSnapshot`](infergate_core::ModelSnapshot);
//! [`watcher`] polls it and republishes the snapshot when files change.

#![deny(unused_crate_dependencies)]

pub mod loader;
pub mod watcher;

pub use loader::{RegistryError, load_snapshot};
pub use watcher::RegistryWatcher;
