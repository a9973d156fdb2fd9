use std::path::Path;

use super::{schema::Config, validate::ConfigError};

/// Reads, parses and validates the config file. Any failure here is fatal.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: origin.clone(),
        source,
    })?;
    parse_config(&raw, &origin)
}

pub(super) fn parse_config(raw: &str, origin: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })?;
    config.validate()?;
    log::debug!(
        "config_loaded origin={} metrics={} instance_names={}",
        origin,
        config.metrics.len(),
        config.instance_names.len()
    );
    Ok(config)
}
