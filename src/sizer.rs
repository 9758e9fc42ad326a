//! Worker pool sizing from host resources.
//!
//! [`WorkerSizer`] reads the CPU core count and the currently available
//! memory and combines them according to a [`SizingPolicy`]. Nothing is
//! cached: every call reflects the host state at call time.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use sysinfo::System;

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Default upper bound on the number of workers.
pub const DEFAULT_MAX_WORKERS: usize = 256;

/// How core count and available memory combine into a worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingPolicy {
    /// The larger of cores and available GiB.
    ///
    /// On hosts with plenty of free memory this can exceed the core count
    /// considerably.
    #[default]
    Larger,
    /// The smaller of cores and available GiB.
    Smaller,
    /// Cores only; memory is ignored.
    CoresOnly,
}

/// Source of host resource figures.
pub trait ResourceProbe: Send + Sync + Debug {
    /// Physical core count, or `None` when it cannot be determined.
    fn physical_cores(&self) -> Option<usize>;

    /// Logical core count.
    fn logical_cores(&self) -> usize;

    /// Currently available memory in bytes.
    fn available_memory_bytes(&self) -> u64;
}

/// Probe backed by `num_cpus` and `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl ResourceProbe for HostProbe {
    fn physical_cores(&self) -> Option<usize> {
        match num_cpus::get_physical() {
            0 => None,
            n => Some(n),
        }
    }

    fn logical_cores(&self) -> usize {
        num_cpus::get()
    }

    fn available_memory_bytes(&self) -> u64 {
        let mut system = System::new();
        system.refresh_memory();
        system.available_memory()
    }
}

/// Host resources observed by a single sizing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub cores: usize,
    pub available_memory_gib: usize,
}

/// Computes a bounded degree of parallelism.
#[derive(Debug, Clone)]
pub struct WorkerSizer<P: ResourceProbe = HostProbe> {
    probe: P,
    policy: SizingPolicy,
    max_workers: usize,
}

impl Default for WorkerSizer<HostProbe> {
    fn default() -> Self {
        Self::new(HostProbe)
    }
}

impl<P: ResourceProbe> WorkerSizer<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            policy: SizingPolicy::default(),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn with_policy(mut self, policy: SizingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap the result. Values below 1 are treated as 1.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn policy(&self) -> SizingPolicy {
        self.policy
    }

    /// Read the host resources.
    pub fn snapshot(&self) -> ResourceSnapshot {
        let cores = self
            .probe
            .physical_cores()
            .unwrap_or_else(|| self.probe.logical_cores());
        let available_memory_gib = (self.probe.available_memory_bytes() / BYTES_PER_GIB) as usize;

        ResourceSnapshot {
            cores,
            available_memory_gib,
        }
    }

    /// Number of workers to use, always in `1..=max_workers`.
    pub fn optimal_parallelism(&self) -> usize {
        let snapshot = self.snapshot();
        let workers = match self.policy {
            SizingPolicy::Larger => snapshot.cores.max(snapshot.available_memory_gib),
            SizingPolicy::Smaller => snapshot.cores.min(snapshot.available_memory_gib),
            SizingPolicy::CoresOnly => snapshot.cores,
        };
        workers.clamp(1, self.max_workers)
    }
}
