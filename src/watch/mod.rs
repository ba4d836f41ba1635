// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Filtering the event stream down to creations.
//! - Driving the dispatch handler until an interrupt arrives.
//!
//! It does **not** know how pipelines are matched or scheduled; it only
//! turns filesystem creations into dispatch calls.

pub mod watcher;

pub use watcher::{DEFAULT_WAIT_SECONDS, WatchOptions, run_until_interrupted, start};
