// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DropflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("no pipeline registry configured for the dispatch handler")]
    RegistryMissing,

    #[error("no pipeline registered for tag '{0}'")]
    UnknownTag(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DropflowError>;
