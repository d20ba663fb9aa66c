// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown generation mode: {0}")]
    UnknownMode(String),

    #[error("Failed to spawn '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process finished with exit code {0}")]
    NonZeroExit(i32),

    #[error("Failed to load model {model}: {reason}")]
    ModelLoadError { model: String, reason: String },

    #[error("A run is already in progress")]
    RunInProgress,

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    pub(crate) fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        LaunchError::SpawnError {
            program: program.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
