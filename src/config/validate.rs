// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::paths::is_inside;
use crate::errors::{DropflowError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DropflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        warn_on_hygiene_risks(&raw);
        Ok(ConfigFile::new_unchecked(raw.watch, raw.pipeline))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_pipelines(cfg)?;
    validate_watch_section(cfg)?;
    validate_pipelines(cfg)?;
    Ok(())
}

fn ensure_has_pipelines(cfg: &RawConfigFile) -> Result<()> {
    if cfg.pipeline.is_empty() {
        return Err(DropflowError::ConfigError(
            "config must contain at least one [pipeline.<tag>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.wait_seconds == 0 {
        return Err(DropflowError::ConfigError(
            "[watch].wait_seconds must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_pipelines(cfg: &RawConfigFile) -> Result<()> {
    for (tag, pipeline) in cfg.pipeline.iter() {
        if tag.is_empty() {
            return Err(DropflowError::ConfigError(
                "pipeline tags must be non-empty".to_string(),
            ));
        }
        if pipeline.tasks.is_empty() {
            return Err(DropflowError::ConfigError(format!(
                "pipeline '{}' must declare at least one task",
                tag
            )));
        }
        for (idx, task) in pipeline.tasks.iter().enumerate() {
            if task.script.as_os_str().is_empty() {
                return Err(DropflowError::ConfigError(format!(
                    "pipeline '{}' task {} has an empty script path",
                    tag, idx
                )));
            }
            if task.group.is_empty() {
                return Err(DropflowError::ConfigError(format!(
                    "pipeline '{}' task {} has an empty group",
                    tag, idx
                )));
            }
            if task.log_dir.as_os_str().is_empty() {
                return Err(DropflowError::ConfigError(format!(
                    "pipeline '{}' task {} has an empty log_dir",
                    tag, idx
                )));
            }
        }
    }
    Ok(())
}

/// Non-fatal checks for configurations that are legal but easy to get wrong.
fn warn_on_hygiene_risks(cfg: &RawConfigFile) {
    warn_on_overlapping_tags(cfg);
    warn_on_split_groups(cfg);
    warn_on_logs_inside_watch_path(cfg);
}

/// Tags match by substring, so a tag contained in another tag means a file
/// for the longer tag also triggers the shorter one.
fn warn_on_overlapping_tags(cfg: &RawConfigFile) {
    for a in cfg.pipeline.keys() {
        for b in cfg.pipeline.keys() {
            if a != b && b.contains(a.as_str()) {
                warn!(
                    tag = %a,
                    other = %b,
                    "tag is a substring of another tag; files matching the longer tag will run both pipelines"
                );
            }
        }
    }
}

/// Scheduling pulls every pending task of the current group into one wave,
/// so a group split by a different group in between does not form two waves.
fn warn_on_split_groups(cfg: &RawConfigFile) {
    for (tag, pipeline) in cfg.pipeline.iter() {
        let mut wave_order: Vec<&str> = Vec::new();
        for task in pipeline.tasks.iter() {
            if wave_order.last().copied() != Some(task.group.as_str()) {
                wave_order.push(task.group.as_str());
            }
        }
        for (idx, group) in wave_order.iter().enumerate() {
            if wave_order[..idx].contains(group) {
                warn!(
                    tag = %tag,
                    group = %group,
                    "group appears in separate places in the task list; its tasks will all run in the earlier wave"
                );
            }
        }
    }
}

/// Log files created inside the watched directory show up as creation events
/// themselves and can re-trigger pipelines.
fn warn_on_logs_inside_watch_path(cfg: &RawConfigFile) {
    for (tag, pipeline) in cfg.pipeline.iter() {
        for task in pipeline.tasks.iter() {
            if is_inside(&cfg.watch.path, &task.log_dir) {
                warn!(
                    tag = %tag,
                    log_dir = %task.log_dir.display(),
                    watch_path = %cfg.watch.path.display(),
                    "log_dir is inside the watched directory; log files may trigger further events"
                );
            }
        }
    }
}
