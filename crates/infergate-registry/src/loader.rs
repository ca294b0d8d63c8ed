//! TOML model definition loader.
//!
//! Each `*.toml` file in the config directory is a table keyed by model
//! name:
//!
//! ```toml
//! [llama-7b.metadata]
//! owned_by = "example"
//! description = "General purpose chat model"
//! tasks = ["chat", "completions"]
//!
//! [llama-7b.network]
//! url = "llama:50051"
//! type = "grpc"
//! ```
//!
//! Files are read in name order; a model defined in more than one file
//! takes the definition from the last one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use infergate_core::{ModelEntry, ModelSnapshot};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading model definitions.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Model '{name}' in {path} is invalid: {message}")]
    InvalidModel {
        name: String,
        path: PathBuf,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct ModelDefinition {
    metadata: Metadata,
    network: Network,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(default)]
    owned_by: String,
    #[serde(default)]
    permission: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tasks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Network {
    url: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// List the `*.toml` files in `dir`, sorted by path.
pub(crate) fn definition_files(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    let io_err = |source| RegistryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn parse_file(path: &Path) -> Result<Vec<ModelEntry>, RegistryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definitions: BTreeMap<String, ModelDefinition> =
        toml::from_str(&raw).map_err(|e| RegistryError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    definitions
        .into_iter()
        .map(|(name, def)| {
            if def.network.url.trim().is_empty() {
                return Err(RegistryError::InvalidModel {
                    name,
                    path: path.to_path_buf(),
                    message: "network.url is empty".to_string(),
                });
            }
            if let Some(kind) = def.network.kind.as_deref() {
                if kind != "grpc" {
                    warn!(model = %name, network_type = %kind, "Unknown network type, dialing as gRPC");
                }
            }
            Ok(ModelEntry {
                name,
                address: def.network.url,
                owned_by: def.metadata.owned_by,
                description: def.metadata.description,
                tasks: def.metadata.tasks.into_iter().collect(),
                permission: def.metadata.permission,
            })
        })
        .collect()
}

/// Load every model definition in `dir` into a snapshot.
///
/// Any unreadable or malformed file fails the whole load, so a caller
/// reloading a live registry can keep its previous snapshot intact.
pub fn load_snapshot(dir: &Path) -> Result<ModelSnapshot, RegistryError> {
    let mut entries: BTreeMap<String, ModelEntry> = BTreeMap::new();

    for path in definition_files(dir)? {
        debug!(path = %path.display(), "Loading model definitions");
        for entry in parse_file(&path)? {
            if entries.contains_key(&entry.name) {
                warn!(
                    model = %entry.name,
                    path = %path.display(),
                    "Model redefined, later definition wins"
                );
            }
            entries.insert(entry.name.clone(), entry);
        }
    }

    Ok(ModelSnapshot::from_entries(entries.into_values()))
}
