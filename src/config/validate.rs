// src/config/validate.rs

use crate::command::ProgramTable;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LaunchError, Result};
use crate::types::GenerationMode;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LaunchError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let programs = validate_programs(&raw)?;
        validate_launcher(&raw)?;
        validate_enhancer(&raw)?;

        // Children run inside the root, so program paths must not be
        // relative to the caller's directory.
        raw.launcher.project_root = std::path::absolute(&raw.launcher.project_root)?;

        Ok(ConfigFile::new_unchecked(raw.launcher, programs, raw.defaults, raw.enhancer))
    }
}

fn validate_programs(cfg: &RawConfigFile) -> Result<ProgramTable> {
    if cfg.programs.is_empty() {
        return Ok(ProgramTable::default());
    }

    let mut table = ProgramTable::empty();
    for (key, program) in cfg.programs.iter() {
        let mode: GenerationMode = key.parse().map_err(|_| {
            LaunchError::ConfigError(format!(
                "[programs] has unknown mode '{}' (expected \"standard\" or \"diffusion-forcing\")",
                key
            ))
        })?;
        if program.as_os_str().is_empty() {
            return Err(LaunchError::ConfigError(format!(
                "[programs].{} must not be empty",
                key
            )));
        }
        table.insert(mode, program.clone());
    }
    Ok(table)
}

fn validate_launcher(cfg: &RawConfigFile) -> Result<()> {
    if cfg.launcher.project_root.as_os_str().is_empty() {
        return Err(LaunchError::ConfigError(
            "[launcher].project_root must not be empty".to_string(),
        ));
    }
    if cfg.launcher.requirements.as_os_str().is_empty() {
        return Err(LaunchError::ConfigError(
            "[launcher].requirements must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_enhancer(cfg: &RawConfigFile) -> Result<()> {
    if cfg.enhancer.max_new_tokens == 0 {
        return Err(LaunchError::ConfigError(
            "[enhancer].max_new_tokens must be >= 1 (got 0)".to_string(),
        ));
    }

    let endpoint = cfg.enhancer.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(LaunchError::ConfigError(format!(
            "[enhancer].endpoint must be an http(s) URL (got '{}')",
            endpoint
        )));
    }
    Ok(())
}
