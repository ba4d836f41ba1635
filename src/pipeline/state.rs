// src/pipeline/state.rs

//! Mutable per-run scheduling state.

use crate::pipeline::task::{ExecutionRecord, GroupId, TaskSpec};

/// Per-run state: the pending descriptor queue, the stop flag and the
/// accumulated execution records.
///
/// Created fresh when a run starts and discarded when it ends; never shared
/// across runs. All mutation happens on the single dispatch task, so no
/// locking is involved.
#[derive(Debug, Default)]
pub struct RunState {
    pending: Vec<TaskSpec>,
    stopped: bool,
    records: Vec<ExecutionRecord>,
}

impl RunState {
    /// Start a run over a copy of the pipeline's descriptor list.
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self {
            pending: tasks,
            stopped: false,
            records: Vec::new(),
        }
    }

    /// Group value of the first remaining descriptor, or `None` when the
    /// queue is empty.
    pub fn next_group(&self) -> Option<GroupId> {
        self.pending.first().map(|task| task.group.clone())
    }

    /// All pending descriptors whose group equals `group`, in queue order.
    ///
    /// Membership is collected across the whole queue, not a contiguous
    /// prefix: a group id reused later in the list is pulled forward into
    /// this wave.
    pub fn wave(&self, group: &str) -> Vec<TaskSpec> {
        self.pending
            .iter()
            .filter(|task| task.group == group)
            .cloned()
            .collect()
    }

    /// Acknowledge a completed task: remove its descriptor from the pending
    /// queue (first occurrence only) and append the record.
    pub fn acknowledge(&mut self, record: ExecutionRecord) {
        if let Some(pos) = self.pending.iter().position(|task| *task == record.task) {
            self.pending.remove(pos);
        }
        self.records.push(record);
    }

    /// Set the stop flag. Never cleared within a run.
    pub fn halt(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn pending(&self) -> &[TaskSpec] {
        &self.pending
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExecutionRecord> {
        self.records
    }
}
