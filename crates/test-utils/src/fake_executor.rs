use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use dropflow::errors::Result;
use dropflow::exec::TaskExecutor;
use dropflow::pipeline::{ExecutionRecord, TaskSpec};
use tracing::debug;
use uuid::Uuid;

/// Something the fake executor observed happening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecEvent {
    Started(String),
    Finished(String),
}

/// A fake executor that:
/// - records start/finish events per script, in order
/// - returns scripted exit codes (default 0) without spawning processes
/// - tracks how many executions overlapped, for concurrency assertions.
///
/// Cloning is cheap and shares the recorded state, so tests can hold a clone
/// while the scheduler owns the original.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    exit_codes: Mutex<HashMap<String, i32>>,
    delays: Mutex<HashMap<String, Duration>>,
    events: Mutex<Vec<ExecEvent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given script finish with this exit code.
    pub fn script_exit_code(&self, script: &str, code: i32) {
        self.inner
            .exit_codes
            .lock()
            .unwrap()
            .insert(script.to_string(), code);
    }

    /// Make the given script take this long before finishing.
    pub fn script_delay(&self, script: &str, delay: Duration) {
        self.inner
            .delays
            .lock()
            .unwrap()
            .insert(script.to_string(), delay);
    }

    /// Everything observed so far, in order.
    pub fn events(&self) -> Vec<ExecEvent> {
        self.inner.events.lock().unwrap().clone()
    }

    /// Script names in the order their executions started.
    pub fn started_order(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExecEvent::Started(name) => Some(name),
                ExecEvent::Finished(_) => None,
            })
            .collect()
    }

    /// Highest number of executions that were ever in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TaskExecutor for FakeExecutor {
    fn execute(
        &self,
        task: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionRecord>> + Send + 'static>> {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            let script = task.script.to_string_lossy().into_owned();

            inner
                .events
                .lock()
                .unwrap()
                .push(ExecEvent::Started(script.clone()));
            let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            inner.max_in_flight.fetch_max(now, Ordering::SeqCst);
            debug!(script = %script, in_flight = now, "fake execution started");

            let delay = inner.delays.lock().unwrap().get(&script).copied();
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                // Yield so wave siblings get a chance to start before we finish.
                None => tokio::task::yield_now().await,
            }

            inner.in_flight.fetch_sub(1, Ordering::SeqCst);
            inner
                .events
                .lock()
                .unwrap()
                .push(ExecEvent::Finished(script.clone()));

            let exit_code = inner
                .exit_codes
                .lock()
                .unwrap()
                .get(&script)
                .copied()
                .unwrap_or(0);
            debug!(script = %script, exit_code, "fake execution finished");

            let run_id = Uuid::new_v4();
            let log_path = task.log_dir.join(format!("{run_id}_fake.txt"));
            Ok(ExecutionRecord {
                task,
                run_id,
                started_at: Local::now(),
                log_path,
                exit_code,
            })
        })
    }
}
