// src/pipeline/task.rs

//! Task descriptors and per-task outcome records.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Concurrency group token. Tasks with equal group values run together.
pub type GroupId = String;

/// One task in a pipeline: an external script plus scheduling metadata.
///
/// Immutable value object; the scheduler clones it freely and compares by
/// value when acknowledging completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Path of the executable script to run.
    pub script: PathBuf,

    /// Concurrency group. Equal values denote "run together".
    pub group: GroupId,

    /// Directory receiving this task's log files (created on demand).
    pub log_dir: PathBuf,
}

impl TaskSpec {
    pub fn new(
        script: impl Into<PathBuf>,
        group: impl Into<GroupId>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            script: script.into(),
            group: group.into(),
            log_dir: log_dir.into(),
        }
    }
}

/// Outcome metadata for one completed task within a run.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    /// The descriptor this record belongs to.
    pub task: TaskSpec,

    /// Unique identifier for this execution; prefixes the log file name.
    pub run_id: Uuid,

    /// When the execution started (local time, also in the log file name).
    pub started_at: DateTime<Local>,

    /// Where this execution's stdout went.
    pub log_path: PathBuf,

    /// Raw exit code; -1 when the process died without one.
    pub exit_code: i32,
}

impl ExecutionRecord {
    /// A zero exit code is the only success signal considered.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Tag whose pipeline ran.
    pub tag: String,

    /// Records in acknowledgment order (wave by wave).
    pub records: Vec<ExecutionRecord>,

    /// True when a task failure stopped the run before later waves.
    pub halted: bool,
}
