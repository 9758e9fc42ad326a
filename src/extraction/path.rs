//! Node locations rendered as JSON Pointers (RFC 6901).
//!
//! A [`NodePath`] is a stack-allocated linked list from a node back to the
//! root. Extending it costs nothing; a pointer string is only built when a
//! match or failure needs one.

use std::fmt;

/// One step from a container to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => {
                for c in key.chars() {
                    match c {
                        '~' => f.write_str("~0")?,
                        '/' => f.write_str("~1")?,
                        c => write!(f, "{c}")?,
                    }
                }
                Ok(())
            }
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a node relative to the extraction root.
#[derive(Debug, Clone, Copy)]
pub struct NodePath<'p, 'a> {
    parent: Option<&'p NodePath<'p, 'a>>,
    segment: Option<PathSegment<'a>>,
    depth: usize,
}

impl<'p, 'a> NodePath<'p, 'a> {
    pub fn root() -> Self {
        Self {
            parent: None,
            segment: None,
            depth: 0,
        }
    }

    pub fn child(&'p self, segment: PathSegment<'a>) -> Self {
        Self {
            parent: Some(self),
            segment: Some(segment),
            depth: self.depth + 1,
        }
    }

    /// Nesting depth; the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Render as a JSON Pointer. The root renders as the empty string.
    pub fn to_pointer(&self) -> String {
        let mut segments = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(path) = current {
            if let Some(segment) = path.segment {
                segments.push(segment);
            }
            current = path.parent;
        }

        segments
            .iter()
            .rev()
            .map(|segment| format!("/{segment}"))
            .collect()
    }
}

impl fmt::Display for NodePath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}
