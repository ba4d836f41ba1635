// src/pipeline/registry.rs

use std::collections::BTreeMap;

use crate::config::model::ConfigFile;
use crate::pipeline::task::TaskSpec;

/// Mapping from tag to the ordered task list run when a created file's name
/// contains that tag.
///
/// Built once at watch-start and read-only afterwards. Iteration order is
/// deterministic (lexicographic by tag), which is also the order in which
/// multiple matching pipelines run for a single file.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pipelines: BTreeMap<String, Vec<TaskSpec>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a loaded config file.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let mut registry = Registry::new();
        for (tag, pipeline) in cfg.pipeline.iter() {
            let tasks = pipeline
                .tasks
                .iter()
                .map(|t| TaskSpec::new(t.script.clone(), t.group.clone(), t.log_dir.clone()))
                .collect();
            registry.insert(tag.clone(), tasks);
        }
        registry
    }

    /// Register a pipeline under `tag`, replacing any previous entry.
    pub fn insert(&mut self, tag: impl Into<String>, tasks: Vec<TaskSpec>) {
        self.pipelines.insert(tag.into(), tasks);
    }

    /// The task list registered for `tag`, if any.
    pub fn pipeline(&self, tag: &str) -> Option<&[TaskSpec]> {
        self.pipelines.get(tag).map(Vec::as_slice)
    }

    /// Tags in deterministic (lexicographic) order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.pipelines.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }
}
