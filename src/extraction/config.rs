//! Configuration for extraction engines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeseekError};
use crate::sizer::{DEFAULT_MAX_WORKERS, SizingPolicy};

/// How child nodes are traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Inline depth-first recursion on the calling thread.
    #[default]
    Sequential,
    /// Children fanned out over the engine's thread pool.
    Parallel,
}

/// What the caller sees when a node fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the partial matches along with every failure.
    #[default]
    Collect,
    /// Return the first failure in traversal order as an error.
    Propagate,
}

/// Configuration for a [`StructuralExtractor`](super::StructuralExtractor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub mode: ExecutionMode,

    pub error_policy: ErrorPolicy,

    /// Used when `thread_pool_size` is not set.
    pub sizing_policy: SizingPolicy,

    /// Thread pool size for parallel mode.
    /// If None, the worker sizer decides.
    pub thread_pool_size: Option<usize>,

    /// Upper bound for the sized pool.
    pub max_workers: usize,

    /// Nodes at this depth or deeper traverse their children inline.
    pub max_fan_out_depth: usize,

    /// Nodes with fewer children traverse them inline.
    pub min_parallel_children: usize,

    /// Deepest nesting level that may be visited. The root is depth 0.
    pub max_depth: usize,

    /// Whether to record metrics.
    pub enable_metrics: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            error_policy: ErrorPolicy::Collect,
            sizing_policy: SizingPolicy::Larger,
            thread_pool_size: None,
            max_workers: DEFAULT_MAX_WORKERS,
            max_fan_out_depth: 8,
            min_parallel_children: 2,
            max_depth: 1024,
            enable_metrics: true,
        }
    }
}

impl ExtractionConfig {
    /// Default configuration in parallel mode.
    pub fn parallel() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_sizing_policy(mut self, policy: SizingPolicy) -> Self {
        self.sizing_policy = policy;
        self
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_max_fan_out_depth(mut self, depth: usize) -> Self {
        self.max_fan_out_depth = depth;
        self
    }

    pub fn with_min_parallel_children(mut self, count: usize) -> Self {
        self.min_parallel_children = count;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Check option combinations that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if self.thread_pool_size == Some(0) {
            return Err(ShapeseekError::config("thread_pool_size must be at least 1"));
        }
        if self.max_workers == 0 {
            return Err(ShapeseekError::config("max_workers must be at least 1"));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}
