//! The structural extraction engine.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde_json::Value;

use crate::error::{Result, ShapeseekError};
use crate::extraction::config::{ErrorPolicy, ExecutionMode, ExtractionConfig};
use crate::extraction::metrics::{ExtractionMetrics, ExtractionMetricsCollector};
use crate::extraction::outcome::{ExtractionReport, MatchRecord, NodeOutcome, TraversalFailure};
use crate::extraction::path::{NodePath, PathSegment};
use crate::matcher::{CoverageMatcher, CoveragePlan};
use crate::sizer::WorkerSizer;
use crate::synonym::SynonymOverrides;

/// Workers recurse as deep as `max_depth`, so they get more stack than the
/// platform default.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Finds every mapping in a nested value whose keys cover a set of format
/// keys.
///
/// An engine in parallel mode owns one thread pool, sized when the engine is
/// built and reused by every call.
#[derive(Debug)]
pub struct StructuralExtractor {
    matcher: CoverageMatcher,
    config: ExtractionConfig,
    thread_pool: Option<Arc<ThreadPool>>,
    metrics: Arc<ExtractionMetricsCollector>,
}

impl Default for StructuralExtractor {
    fn default() -> Self {
        Self::sequential(CoverageMatcher::default())
    }
}

impl StructuralExtractor {
    /// Create an engine. In parallel mode this builds the thread pool.
    pub fn new(matcher: CoverageMatcher, config: ExtractionConfig) -> Result<Self> {
        config.validate()?;

        let thread_pool = match config.mode {
            ExecutionMode::Sequential => None,
            ExecutionMode::Parallel => Some(Arc::new(Self::build_pool(&config)?)),
        };

        Ok(Self {
            matcher,
            config,
            thread_pool,
            metrics: Arc::new(ExtractionMetricsCollector::new()),
        })
    }

    /// Create a sequential engine with the default configuration.
    pub fn sequential(matcher: CoverageMatcher) -> Self {
        Self {
            matcher,
            config: ExtractionConfig::default(),
            thread_pool: None,
            metrics: Arc::new(ExtractionMetricsCollector::new()),
        }
    }

    fn build_pool(config: &ExtractionConfig) -> Result<ThreadPool> {
        let threads = config.thread_pool_size.unwrap_or_else(|| {
            WorkerSizer::default()
                .with_policy(config.sizing_policy)
                .with_max_workers(config.max_workers)
                .optimal_parallelism()
        });
        debug!("Building extraction pool with {threads} threads");

        ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("shapeseek-worker-{i}"))
            .stack_size(WORKER_STACK_SIZE)
            .build()
            .map_err(|e| {
                ShapeseekError::resource_exhausted(format!("Failed to create thread pool: {e}"))
            })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn matcher(&self) -> &CoverageMatcher {
        &self.matcher
    }

    /// Number of worker threads; 1 for a sequential engine.
    pub fn thread_count(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map_or(1, |pool| pool.current_num_threads())
    }

    pub fn metrics(&self) -> ExtractionMetrics {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Every mapping in `data` that covers `format_keys`, in depth-first
    /// pre-order.
    ///
    /// Under [`ErrorPolicy::Collect`] nodes that failed are logged and left
    /// out; use [`extract_report`](Self::extract_report) to inspect them.
    pub fn extract<'a, S: AsRef<str>>(
        &self,
        data: &'a Value,
        format_keys: &[S],
        overrides: &SynonymOverrides,
    ) -> Result<Vec<&'a Value>> {
        Ok(self.extract_report(data, format_keys, overrides)?.values())
    }

    /// Like [`extract`](Self::extract), also returning match locations and
    /// failed nodes.
    pub fn extract_report<'a, S: AsRef<str>>(
        &self,
        data: &'a Value,
        format_keys: &[S],
        overrides: &SynonymOverrides,
    ) -> Result<ExtractionReport<'a>> {
        let start = Instant::now();
        let plan = self.matcher.plan(format_keys, overrides)?;
        debug!(
            "Extracting with {} format keys in {:?} mode",
            plan.keys().len(),
            self.config.mode
        );

        let traversal = Traversal {
            plan: &plan,
            config: &self.config,
            pool: self.thread_pool.as_deref(),
            metrics: self.config.enable_metrics.then_some(self.metrics.as_ref()),
        };
        let outcome = match traversal.pool {
            Some(pool) => pool.install(|| traversal.visit(data, &NodePath::root())),
            None => traversal.visit(data, &NodePath::root()),
        };
        let report = ExtractionReport::from(outcome);

        if self.config.enable_metrics {
            self.metrics.record_run(start.elapsed());
        }

        if let Some(first) = report.failures.first() {
            match self.config.error_policy {
                ErrorPolicy::Propagate => return Err(first.clone().into()),
                ErrorPolicy::Collect => {
                    for failure in &report.failures {
                        warn!(
                            "Skipped subtree at '{}': {}",
                            failure.pointer, failure.message
                        );
                    }
                }
            }
        }

        debug!(
            "Extraction found {} matches and {} failures in {:?}",
            report.matches.len(),
            report.failures.len(),
            start.elapsed()
        );
        Ok(report)
    }
}

/// State shared by every node of one extraction call.
struct Traversal<'e> {
    plan: &'e CoveragePlan,
    config: &'e ExtractionConfig,
    pool: Option<&'e ThreadPool>,
    metrics: Option<&'e ExtractionMetricsCollector>,
}

impl Traversal<'_> {
    fn visit<'a>(&self, value: &'a Value, path: &NodePath<'_, 'a>) -> NodeOutcome<'a> {
        if path.depth() > self.config.max_depth {
            return self.fail(
                path,
                format!("maximum nesting depth {} exceeded", self.config.max_depth),
            );
        }
        if let Some(metrics) = self.metrics {
            metrics.record_node();
        }

        match value {
            Value::Object(map) => {
                let coverage = self.plan.evaluate(map);
                if let Some(metrics) = self.metrics {
                    metrics.record_mapping(coverage.comparisons, coverage.covered);
                }

                let mut outcome = NodeOutcome::default();
                if coverage.covered {
                    outcome.matches.push(MatchRecord {
                        pointer: path.to_pointer(),
                        value,
                    });
                }

                let children: Vec<_> = map
                    .iter()
                    .map(|(key, child)| (PathSegment::Key(key.as_str()), child))
                    .collect();
                outcome.merge(self.visit_children(&children, path));
                outcome
            }
            Value::Array(items) => {
                let children: Vec<_> = items
                    .iter()
                    .enumerate()
                    .map(|(index, child)| (PathSegment::Index(index), child))
                    .collect();
                self.visit_children(&children, path)
            }
            _ => NodeOutcome::default(),
        }
    }

    fn visit_children<'a>(
        &self,
        children: &[(PathSegment<'a>, &'a Value)],
        path: &NodePath<'_, 'a>,
    ) -> NodeOutcome<'a> {
        let fan_out = self.pool.is_some()
            && path.depth() < self.config.max_fan_out_depth
            && children.len() >= self.config.min_parallel_children.max(2);

        if !fan_out {
            let mut outcome = NodeOutcome::default();
            for &(segment, child) in children {
                outcome.merge(self.visit(child, &path.child(segment)));
            }
            return outcome;
        }

        // Indexed collect keeps child order.
        let outcomes: Vec<NodeOutcome<'a>> = children
            .par_iter()
            .map(|&(segment, child)| self.visit(child, &path.child(segment)))
            .collect();

        let mut outcome = NodeOutcome::default();
        for child in outcomes {
            outcome.merge(child);
        }
        outcome
    }

    fn fail<'a>(&self, path: &NodePath<'_, 'a>, message: String) -> NodeOutcome<'a> {
        if let Some(metrics) = self.metrics {
            metrics.record_failure();
        }
        NodeOutcome::failed(TraversalFailure::new(path.to_pointer(), message))
    }
}
