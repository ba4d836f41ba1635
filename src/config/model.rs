// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::FallbackAction;
use crate::watch::DEFAULT_WAIT_SECONDS;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// path = "landing"
/// recursive = false
/// wait_seconds = 20
/// on_unmatched = "none"
///
/// [pipeline.sales]
/// tasks = [
///     { script = "scripts/extract.sh", group = "extract", log_dir = "logs/sales" },
///     { script = "scripts/load.sh", group = "load", log_dir = "logs/sales" },
/// ]
/// ```
///
/// The `[watch]` section is optional; `[pipeline.<tag>]` tables are keyed by
/// the tag matched against created file names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub pipeline: BTreeMap<String, PipelineConfig>,
}

/// Configuration that has passed validation.
///
/// Construct via `TryFrom<RawConfigFile>` (see [`validate`]) or through
/// [`loader::load_and_validate`].
///
/// [`validate`]: super::validate
/// [`loader::load_and_validate`]: super::loader::load_and_validate
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub pipeline: BTreeMap<String, PipelineConfig>,
}

impl ConfigFile {
    /// Build a `ConfigFile` without running validation. Callers are expected
    /// to have validated the contents already.
    pub fn new_unchecked(watch: WatchSection, pipeline: BTreeMap<String, PipelineConfig>) -> Self {
        Self { watch, pipeline }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory observed for file creations.
    #[serde(default = "default_watch_path")]
    pub path: PathBuf,

    /// Whether subdirectories are watched too.
    #[serde(default)]
    pub recursive: bool,

    /// Heartbeat interval of the watch loop, in seconds.
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,

    /// What to do with created files no tag matches.
    #[serde(default)]
    pub on_unmatched: FallbackAction,
}

fn default_watch_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_wait_seconds() -> u64 {
    DEFAULT_WAIT_SECONDS
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            path: default_watch_path(),
            recursive: false,
            wait_seconds: default_wait_seconds(),
            on_unmatched: FallbackAction::default(),
        }
    }
}

/// `[pipeline.<tag>]` section: the ordered task list run when the tag
/// matches a created file name.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub tasks: Vec<TaskEntry>,
}

/// One task within a pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEntry {
    /// Executable to run.
    pub script: PathBuf,

    /// Wave label; consecutive tasks sharing a group run concurrently.
    pub group: String,

    /// Directory receiving the per-execution stdout log.
    pub log_dir: PathBuf,
}
