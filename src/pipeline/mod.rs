// src/pipeline/mod.rs

//! Pipeline model and group-wave scheduling.
//!
//! - [`task`] defines the task descriptor and outcome record types.
//! - [`registry`] maps tags to their pipelines.
//! - [`state`] holds the mutable per-run queue, stop flag and records.
//! - [`scheduler`] drives the group-wave loop with fail-fast semantics.

pub mod registry;
pub mod scheduler;
pub mod state;
pub mod task;

pub use registry::Registry;
pub use scheduler::{MAX_WAVE_WORKERS, PipelineScheduler};
pub use state::RunState;
pub use task::{ExecutionRecord, GroupId, RunSummary, TaskSpec};
