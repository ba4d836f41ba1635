// src/exec/mod.rs

//! Process execution layer.
//!
//! Responsible for actually running the scripts named by task descriptors,
//! using `tokio::process::Command`, and turning each run into an
//! [`ExecutionRecord`].
//!
//! - [`backend`] provides the `TaskExecutor` trait and the concrete
//!   `ProcessExecutor` used in production; tests can replace it with a fake
//!   implementation.
//! - [`task_runner`] handles individual script execution and log capture.
//!
//! [`ExecutionRecord`]: crate::pipeline::ExecutionRecord

pub mod backend;
pub mod task_runner;

pub use backend::{ProcessExecutor, TaskExecutor};
pub use task_runner::{ensure_log_dir, run_script};
