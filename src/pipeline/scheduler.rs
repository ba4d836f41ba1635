// src/pipeline/scheduler.rs

//! Group-wave pipeline scheduler.
//!
//! A pipeline is an ordered list of task descriptors, each carrying a group
//! token. Execution proceeds in waves: take the group of the first pending
//! descriptor, run every pending descriptor with that group value
//! (concurrently, bounded), and only once the whole wave has completed start
//! the next one. A non-zero exit anywhere in a wave stops the run before the
//! next wave; siblings already dispatched still run to completion.
//!
//! Wave membership is collected across the *entire* pending queue, not just
//! a contiguous prefix. An author who reuses a group id later in the list
//! (say `1, 2, 1`) will see the third task pulled forward into the first
//! wave. Declare group ids in contiguous runs.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::errors::{DropflowError, Result};
use crate::exec::TaskExecutor;
use crate::pipeline::registry::Registry;
use crate::pipeline::state::RunState;
use crate::pipeline::task::{ExecutionRecord, RunSummary, TaskSpec};

/// Upper bound on concurrently running tasks within one wave.
pub const MAX_WAVE_WORKERS: usize = 5;

/// Runs one pipeline at a time with group-wave ordering and fail-fast
/// semantics. Holds the executor used to run task scripts.
pub struct PipelineScheduler<E> {
    executor: E,
}

impl<E: TaskExecutor> PipelineScheduler<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Execute the pipeline registered for `tag` to completion or fail-fast
    /// halt.
    ///
    /// Callers are expected to pass a tag they found in the registry; an
    /// unknown tag surfaces as a typed error. Executor errors (spawn or log
    /// file failures) propagate; task failures do not, they are recorded and
    /// stop the run after the current wave.
    pub async fn start_run(&self, registry: &Registry, tag: &str) -> Result<RunSummary> {
        let tasks = registry
            .pipeline(tag)
            .ok_or_else(|| DropflowError::UnknownTag(tag.to_string()))?;

        let mut state = RunState::new(tasks.to_vec());
        info!(tag, tasks = tasks.len(), "starting pipeline run");

        while !state.is_stopped() {
            let Some(group) = state.next_group() else {
                break;
            };
            let mut wave = state.wave(&group);
            debug!(tag, group = %group, size = wave.len(), "dispatching group wave");

            let records = match wave.len() {
                0 => break,
                1 => {
                    // Single member: run it directly, no pool.
                    let task = wave.remove(0);
                    vec![self.executor.execute(task).await?]
                }
                _ => self.run_wave(wave).await?,
            };

            let mut wave_failed = false;
            for record in records {
                if !record.succeeded() {
                    warn!(
                        tag,
                        script = %record.task.script.display(),
                        exit_code = record.exit_code,
                        "task failed; run stops after this wave"
                    );
                    wave_failed = true;
                }
                state.acknowledge(record);
            }
            if wave_failed {
                state.halt();
            }
        }

        let halted = state.is_stopped();
        let records = state.into_records();
        if halted {
            warn!(tag, completed = records.len(), "pipeline run halted on task failure");
        } else {
            info!(tag, completed = records.len(), "pipeline run finished");
        }

        Ok(RunSummary {
            tag: tag.to_string(),
            records,
            halted,
        })
    }

    /// Launch every wave member through a bounded worker pool and wait for
    /// all of them. The pool lives for exactly one wave. Records come back
    /// in spawn order.
    async fn run_wave(&self, wave: Vec<TaskSpec>) -> Result<Vec<ExecutionRecord>> {
        let semaphore = Arc::new(Semaphore::new(MAX_WAVE_WORKERS));
        let mut handles = Vec::with_capacity(wave.len());

        for task in wave {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("wave worker pool closed unexpectedly")?;
            let fut = self.executor.execute(task);
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                fut.await
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            let record = handle.await.context("wave worker panicked")??;
            records.push(record);
        }

        Ok(records)
    }
}
