// src/dispatch.rs

//! Routing from filesystem events to pipeline runs.
//!
//! The dispatch handler owns the registry and the scheduler. For every file
//! creation it compares the file name against each registered tag and starts
//! one pipeline run per matching tag, in registry order. Matching is plain
//! substring containment, so a file can legitimately trigger several
//! pipelines. Prefer tag names that do not contain one another unless that
//! fan-out is wanted.
//!
//! Files that match no tag are handed to the configured fallback action.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::{debug, info};

use crate::errors::{DropflowError, Result};
use crate::exec::{ProcessExecutor, TaskExecutor};
use crate::pipeline::{PipelineScheduler, Registry, RunSummary};
use crate::types::{FallbackAction, TIMESTAMP_FORMAT};

/// A single filesystem creation observed by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub is_directory: bool,
}

impl FileEvent {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }
}

/// Handles creation events by starting pipeline runs for matching tags.
pub struct DispatchHandler<E> {
    registry: Option<Registry>,
    fallback: FallbackAction,
    scheduler: PipelineScheduler<E>,
}

impl DispatchHandler<ProcessExecutor> {
    pub fn new(registry: Option<Registry>, fallback: FallbackAction) -> Self {
        Self::with_executor(registry, fallback, ProcessExecutor::new())
    }
}

impl<E: TaskExecutor> DispatchHandler<E> {
    pub fn with_executor(
        registry: Option<Registry>,
        fallback: FallbackAction,
        executor: E,
    ) -> Self {
        Self {
            registry,
            fallback,
            scheduler: PipelineScheduler::new(executor),
        }
    }

    /// React to one creation event.
    ///
    /// Returns one run summary per matched tag (empty when the fallback
    /// handled the file). A missing or empty registry is a fatal
    /// configuration error; the watcher is useless without pipelines.
    pub async fn on_file_created(&self, event: &FileEvent) -> Result<Vec<RunSummary>> {
        if event.is_directory {
            debug!(path = %event.path.display(), "ignoring directory creation");
            return Ok(Vec::new());
        }

        let registry = match &self.registry {
            Some(registry) if !registry.is_empty() => registry,
            _ => return Err(DropflowError::RegistryMissing),
        };

        let file_name = file_name_of(&event.path);
        let mut summaries = Vec::new();
        for tag in registry.tags() {
            if file_name.contains(tag) {
                info!(tag, file = %file_name, "tag matched; starting pipeline run");
                summaries.push(self.scheduler.start_run(registry, tag).await?);
            }
        }

        if summaries.is_empty() {
            self.apply_fallback(&event.path)?;
        }
        Ok(summaries)
    }

    fn apply_fallback(&self, path: &Path) -> Result<()> {
        match self.fallback {
            FallbackAction::None => {
                info!(
                    path = %path.display(),
                    timestamp = %Local::now().format(TIMESTAMP_FORMAT),
                    "no pipeline matched; leaving file in place"
                );
            }
            FallbackAction::Delete => {
                std::fs::remove_file(path)
                    .with_context(|| format!("deleting unmatched file {:?}", path))?;
                info!(path = %path.display(), "no pipeline matched; deleted file");
            }
        }
        Ok(())
    }
}

/// Final path segment used for tag matching. Falls back to the whole path
/// when there is no file name (e.g. a bare root).
fn file_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}
