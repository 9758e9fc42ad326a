//! Per-node results and the report returned to callers.

use serde::Serialize;
use serde_json::Value;

use crate::error::ShapeseekError;

/// A mapping that covers every format key, with its location in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord<'a> {
    pub pointer: String,
    pub value: &'a Value,
}

/// A node that could not be processed. Its subtree contributed no matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalFailure {
    pub pointer: String,
    pub message: String,
}

impl TraversalFailure {
    pub fn new<P: Into<String>, M: Into<String>>(pointer: P, message: M) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

impl From<TraversalFailure> for ShapeseekError {
    fn from(failure: TraversalFailure) -> Self {
        ShapeseekError::traversal(failure.pointer, failure.message)
    }
}

/// What one node and its subtree produced, in traversal order.
#[derive(Debug, Default)]
pub(crate) struct NodeOutcome<'a> {
    pub(crate) matches: Vec<MatchRecord<'a>>,
    pub(crate) failures: Vec<TraversalFailure>,
}

impl<'a> NodeOutcome<'a> {
    pub(crate) fn failed(failure: TraversalFailure) -> Self {
        Self {
            matches: Vec::new(),
            failures: vec![failure],
        }
    }

    /// Append a later sibling's outcome.
    pub(crate) fn merge(&mut self, other: NodeOutcome<'a>) {
        self.matches.extend(other.matches);
        self.failures.extend(other.failures);
    }
}

/// Result of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport<'a> {
    /// Matching mappings in depth-first pre-order.
    pub matches: Vec<MatchRecord<'a>>,
    /// Nodes that failed, in traversal order.
    pub failures: Vec<TraversalFailure>,
}

impl<'a> ExtractionReport<'a> {
    /// The matched mappings without their locations.
    pub fn values(&self) -> Vec<&'a Value> {
        self.matches.iter().map(|m| m.value).collect()
    }

    pub fn pointers(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.pointer.as_str()).collect()
    }

    /// Whether every node was processed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<'a> From<NodeOutcome<'a>> for ExtractionReport<'a> {
    fn from(outcome: NodeOutcome<'a>) -> Self {
        Self {
            matches: outcome.matches,
            failures: outcome.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_merge_keeps_order() {
        let a = json!({"a": 1});
        let b = json!({"b": 2});

        let mut outcome = NodeOutcome::default();
        outcome.matches.push(MatchRecord {
            pointer: "/0".into(),
            value: &a,
        });
        let mut later = NodeOutcome::failed(TraversalFailure::new("/1/x", "boom"));
        later.matches.push(MatchRecord {
            pointer: "/2".into(),
            value: &b,
        });
        outcome.merge(later);

        let report = ExtractionReport::from(outcome);
        assert_eq!(report.pointers(), vec!["/0", "/2"]);
        assert_eq!(report.values(), vec![&a, &b]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_failure_into_error() {
        let err: ShapeseekError = TraversalFailure::new("/a/0", "too deep").into();
        assert_eq!(err.to_string(), "Traversal error at '/a/0': too deep");
    }
}
