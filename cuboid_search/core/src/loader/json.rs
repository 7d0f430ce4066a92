//! JSON configuration files

use super::{ConfigError, LoadResult, SearchConfig};
use std::fs;
use std::path::Path;

/// Parse a configuration from JSON text
///
/// Parsing does not validate; call [`SearchConfig::validate`] afterwards.
pub fn parse_config(json: &str) -> LoadResult<SearchConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Load and validate a configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> LoadResult<SearchConfig> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileNotFound {
        path: path.display().to_string(),
        source,
    })?;

    let config = parse_config(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Write a configuration as pretty JSON
pub fn save_config<P: AsRef<Path>>(config: &SearchConfig, path: P) -> LoadResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
