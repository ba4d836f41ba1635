#![allow(dead_code)]

use dropflow::pipeline::{Registry, TaskSpec};

/// Shorthand for building a task descriptor in tests.
pub fn spec(script: &str, group: &str, log_dir: &str) -> TaskSpec {
    TaskSpec::new(script, group, log_dir)
}

/// Builder for `Registry` to simplify test setup.
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn with_pipeline(mut self, tag: &str, tasks: Vec<TaskSpec>) -> Self {
        self.registry.insert(tag, tasks);
        self
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
