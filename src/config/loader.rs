// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for unknown program modes, empty paths and enhancer sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration for a CLI invocation.
///
/// An explicitly given path must exist. Without one, `Genlaunch.toml` in the
/// current directory is used if present, and built-in defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path)
            } else {
                debug!(path = %path.display(), "no config file found; using built-in defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Genlaunch.toml")
}
