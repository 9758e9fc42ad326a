//! Structural extraction.
//!
//! [`StructuralExtractor`] walks a `serde_json::Value` depth-first and reports
//! every mapping whose keys cover the requested format keys. Traversal either
//! recurses inline or fans children out over a rayon pool owned by the engine;
//! both produce the same matches in the same order.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod outcome;
pub mod path;

pub use config::{ErrorPolicy, ExecutionMode, ExtractionConfig};
pub use engine::StructuralExtractor;
pub use metrics::{ExtractionMetrics, ExtractionMetricsCollector};
pub use outcome::{ExtractionReport, MatchRecord, TraversalFailure};
pub use path::{NodePath, PathSegment};
