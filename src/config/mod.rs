// src/config/mod.rs

//! Configuration loading and validation for dropflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate pipeline contents and warn about risky setups (`validate.rs`).
//! - Relate configured paths to each other for those warnings (`paths.rs`).

pub mod loader;
pub mod model;
pub mod paths;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, PipelineConfig, RawConfigFile, TaskEntry, WatchSection};
