// src/exec/backend.rs

//! Pluggable task executor abstraction.
//!
//! The scheduler talks to a `TaskExecutor` instead of spawning processes
//! directly. This makes it easy to swap in a fake executor in tests while
//! keeping the production process handling in [`task_runner`].
//!
//! - `ProcessExecutor` is the default implementation used by `dropflow`.
//! - Tests can provide their own `TaskExecutor` that, for example, records
//!   which scripts ran and returns scripted exit codes.
//!
//! [`task_runner`]: super::task_runner

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::pipeline::{ExecutionRecord, TaskSpec};

use super::task_runner::run_script;

/// Trait abstracting how a single task descriptor is executed.
///
/// The returned future is `'static` so the scheduler can hand wave members
/// to its worker pool.
pub trait TaskExecutor: Send + Sync {
    /// Run one task to completion and return its execution record.
    ///
    /// A non-zero exit code is reported inside the record, not as an error;
    /// `Err` is reserved for filesystem and spawn failures.
    fn execute(
        &self,
        task: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionRecord>> + Send + 'static>>;
}

/// Real executor used in production: runs the script as a subprocess with
/// stdout redirected into a per-execution log file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl TaskExecutor for ProcessExecutor {
    fn execute(
        &self,
        task: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionRecord>> + Send + 'static>> {
        Box::pin(run_script(task))
    }
}
