// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::pipeline::Registry;
use crate::watch::WatchOptions;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the pipeline registry
/// - the file watcher and dispatch loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let registry = Registry::from_config(&cfg);
    info!(
        pipelines = registry.len(),
        path = %cfg.watch.path.display(),
        "registry built; starting watcher"
    );

    let options = WatchOptions {
        path: cfg.watch.path.clone(),
        recursive: cfg.watch.recursive,
        wait: Duration::from_secs(cfg.watch.wait_seconds),
    };

    watch::start(options, Some(registry), cfg.watch.on_unmatched).await?;
    Ok(())
}

/// Simple dry-run output: print the watch settings and registered pipelines.
fn print_dry_run(cfg: &ConfigFile) {
    println!("dropflow dry-run");
    println!("  watch.path = {:?}", cfg.watch.path);
    println!("  watch.recursive = {}", cfg.watch.recursive);
    println!("  watch.wait_seconds = {}", cfg.watch.wait_seconds);
    println!("  watch.on_unmatched = {:?}", cfg.watch.on_unmatched);
    println!();

    println!("pipelines ({}):", cfg.pipeline.len());
    for (tag, pipeline) in cfg.pipeline.iter() {
        println!("  - {tag} ({} tasks)", pipeline.tasks.len());
        for task in pipeline.tasks.iter() {
            println!(
                "      group {}: {} (logs: {})",
                task.group,
                task.script.display(),
                task.log_dir.display()
            );
        }
    }

    debug!("dry-run complete (no execution)");
}
