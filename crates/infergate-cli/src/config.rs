//! Settings resolution: defaults, then the settings file, then flags and
//! environment.

use std::path::Path;

use infergate_core::{GatewaySettings, validate_settings};
use tracing::debug;

use crate::error::CliError;

/// Resolve the effective settings for this invocation.
pub fn load_settings(
    file: Option<&Path>,
    overrides: &GatewaySettings,
) -> Result<GatewaySettings, CliError> {
    let mut settings = GatewaySettings::with_defaults();

    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        let from_file: GatewaySettings = toml::from_str(&text)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loaded settings file");
        settings.merge(&from_file);
    }

    settings.merge(overrides);
    validate_settings(&settings)?;
    Ok(settings)
}
