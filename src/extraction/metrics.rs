//! Metrics collection for extraction runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters accumulated over every extraction run on an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionMetrics {
    /// Number of extraction calls.
    pub runs: u64,

    /// Nodes of every kind visited.
    pub nodes_visited: u64,

    /// Mapping nodes evaluated for coverage.
    pub mappings_evaluated: u64,

    /// Structural/format key pairs compared.
    pub comparisons: u64,

    /// Mapping nodes reported as matches.
    pub matches: u64,

    /// Nodes that failed.
    pub failures: u64,

    /// Total time spent in extraction calls.
    pub total_elapsed: Duration,
}

/// Thread-safe collector shared by all workers of an engine.
#[derive(Debug)]
pub struct ExtractionMetricsCollector {
    runs: AtomicU64,
    nodes_visited: AtomicU64,
    mappings_evaluated: AtomicU64,
    comparisons: AtomicU64,
    matches: AtomicU64,
    failures: AtomicU64,
    total_elapsed_nanos: AtomicU64,
    start_time: Instant,
}

impl ExtractionMetricsCollector {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            nodes_visited: AtomicU64::new(0),
            mappings_evaluated: AtomicU64::new(0),
            comparisons: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            total_elapsed_nanos: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_node(&self) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one mapping evaluation.
    pub fn record_mapping(&self, comparisons: u64, matched: bool) {
        self.mappings_evaluated.fetch_add(1, Ordering::Relaxed);
        self.comparisons.fetch_add(comparisons, Ordering::Relaxed);
        if matched {
            self.matches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished extraction call.
    pub fn record_run(&self, elapsed: Duration) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.total_elapsed_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Get the current metrics snapshot.
    pub fn snapshot(&self) -> ExtractionMetrics {
        ExtractionMetrics {
            runs: self.runs.load(Ordering::Relaxed),
            nodes_visited: self.nodes_visited.load(Ordering::Relaxed),
            mappings_evaluated: self.mappings_evaluated.load(Ordering::Relaxed),
            comparisons: self.comparisons.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            total_elapsed: Duration::from_nanos(self.total_elapsed_nanos.load(Ordering::Relaxed)),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.runs.store(0, Ordering::Relaxed);
        self.nodes_visited.store(0, Ordering::Relaxed);
        self.mappings_evaluated.store(0, Ordering::Relaxed);
        self.comparisons.store(0, Ordering::Relaxed);
        self.matches.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.total_elapsed_nanos.store(0, Ordering::Relaxed);
    }

    /// Time since the collector was created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ExtractionMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
