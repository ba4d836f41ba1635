// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use notify::event::CreateKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dispatch::{DispatchHandler, FileEvent};
use crate::errors::Result;
use crate::exec::TaskExecutor;
use crate::pipeline::Registry;
use crate::types::FallbackAction;

/// How long the watch loop sleeps between heartbeats when nothing happens.
pub const DEFAULT_WAIT_SECONDS: u64 = 20;

/// Where and how to watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub path: PathBuf,
    pub recursive: bool,
    pub wait: Duration,
}

impl WatchOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            wait: Duration::from_secs(DEFAULT_WAIT_SECONDS),
        }
    }
}

/// Watch a directory and run pipelines until Ctrl+C.
///
/// Creation events are handled strictly one at a time; a run in flight when
/// the interrupt arrives finishes before this returns, while events still
/// queued behind it are abandoned.
pub async fn start(
    options: WatchOptions,
    registry: Option<Registry>,
    fallback: FallbackAction,
) -> Result<()> {
    let (interrupt_tx, interrupt_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = interrupt_tx.send(());
            }
            Err(e) => {
                eprintln!("failed to listen for Ctrl+C: {e}");
                // Hold the sender so the watch loop keeps running; a closed
                // interrupt channel would stop it.
                std::future::pending::<()>().await;
            }
        }
    });

    let handler = DispatchHandler::new(registry, fallback);
    run_until_interrupted(options, handler, interrupt_rx).await
}

/// Core watch loop, separated from signal handling so tests can drive the
/// interrupt themselves.
pub async fn run_until_interrupted<E: TaskExecutor + 'static>(
    options: WatchOptions,
    handler: DispatchHandler<E>,
    mut interrupt: oneshot::Receiver<()>,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<FileEvent>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    return;
                }
                for path in event.paths {
                    let is_directory = is_directory_event(&event.kind, &path);
                    let file_event = FileEvent {
                        path,
                        is_directory,
                    };
                    if let Err(err) = event_tx.send(file_event) {
                        // No tracing from the notify callback thread; use stderr.
                        eprintln!("dropflow: failed to forward notify event: {err}");
                    }
                }
            }
            Err(err) => {
                eprintln!("dropflow: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .context("creating filesystem watcher")?;

    let mode = if options.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher
        .watch(&options.path, mode)
        .with_context(|| format!("watching {:?}", options.path))?;

    info!(
        path = %options.path.display(),
        recursive = options.recursive,
        "file watcher started"
    );

    let (stop_tx, stop_rx) = oneshot::channel();
    let mut dispatch = spawn_dispatch_loop(handler, event_rx, stop_rx);

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                info!("interrupt received; stopping watcher");
                break;
            }
            res = &mut dispatch => {
                // The dispatch loop only exits early on a fatal error or a
                // closed event channel.
                return flatten_dispatch(res);
            }
            _ = tokio::time::sleep(options.wait) => {
                debug!("watch loop heartbeat");
            }
        }
    }

    drop(watcher);
    let _ = stop_tx.send(());
    let res = dispatch.await;
    info!("watcher stopped");
    flatten_dispatch(res)
}

/// Consume creation events one at a time until stopped.
///
/// The `biased` select checks the stop signal first, so at most the event
/// already being handled survives an interrupt.
fn spawn_dispatch_loop<E: TaskExecutor + 'static>(
    handler: DispatchHandler<E>,
    mut events: mpsc::UnboundedReceiver<FileEvent>,
    mut stop: oneshot::Receiver<()>,
) -> JoinHandle<Result<()>> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = &mut stop => {
                    debug!("dispatch loop stopping; abandoning queued events");
                    break;
                }
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        debug!("watch event channel closed");
                        break;
                    };
                    handler.on_file_created(&event).await?;
                }
            }
        }
        Ok(())
    })
}

fn flatten_dispatch(res: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(inner) => inner,
        Err(join_err) => Err(anyhow::Error::new(join_err)
            .context("dispatch loop panicked")
            .into()),
    }
}

/// Classify a creation event. Notify tells us the kind on most platforms;
/// when it reports `CreateKind::Any` we fall back to asking the filesystem.
fn is_directory_event(kind: &EventKind, path: &std::path::Path) -> bool {
    match kind {
        EventKind::Create(CreateKind::Folder) => true,
        EventKind::Create(CreateKind::File) => false,
        _ => path.is_dir(),
    }
}
