// src/exec/task_runner.rs

//! Subprocess execution for a single task descriptor.
//!
//! Each execution gets a fresh v4 run id and a log file named
//! `<run_id>_<timestamp>.txt` inside the task's log directory. Only stdout
//! is captured; stderr stays attached to the watcher's own stderr so script
//! failures remain visible in the terminal.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use chrono::{DateTime, Local};
use tokio::process::Command;
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;
use crate::pipeline::{ExecutionRecord, TaskSpec};
use crate::types::TIMESTAMP_FORMAT;

/// Create the log directory if it does not exist yet.
///
/// Safe to call for every execution; an existing directory is not an error.
pub fn ensure_log_dir(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {:?}", log_dir))?;
    Ok(())
}

fn log_path_for(task: &TaskSpec, run_id: Uuid, started_at: &DateTime<Local>) -> PathBuf {
    task.log_dir
        .join(format!("{run_id}_{}.txt", started_at.format(TIMESTAMP_FORMAT)))
}

/// Run one script to completion, capturing stdout into its log file.
///
/// A non-zero exit code is returned inside the record rather than as an
/// error. Processes terminated by a signal are recorded with exit code -1.
pub async fn run_script(task: TaskSpec) -> Result<ExecutionRecord> {
    let run_id = Uuid::new_v4();
    let started_at = Local::now();

    ensure_log_dir(&task.log_dir)?;
    let log_path = log_path_for(&task, run_id, &started_at);
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("creating log file {:?}", log_path))?;

    info!(
        script = %task.script.display(),
        run_id = %run_id,
        log = %log_path.display(),
        "starting task process"
    );

    let status = Command::new(&task.script)
        .stdout(Stdio::from(log_file))
        .status()
        .await
        .with_context(|| format!("spawning script {:?}", task.script))?;

    let exit_code = status.code().unwrap_or(-1);
    info!(
        script = %task.script.display(),
        run_id = %run_id,
        exit_code,
        "task process exited"
    );

    Ok(ExecutionRecord {
        task,
        run_id,
        started_at,
        log_path,
        exit_code,
    })
}
