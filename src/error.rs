//! Error types for shapeseek.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`ShapeseekError`] enum. Lexical lookup failures are normally recovered by
//! the synonym resolver and never reach the caller of an extraction; traversal
//! failures reach the caller only when the extraction engine is configured to
//! propagate them.
//!
//! # Examples
//!
//! ```
//! use shapeseek::error::{Result, ShapeseekError};
//!
//! fn check_key(key: &str) -> Result<()> {
//!     if key.is_empty() {
//!         return Err(ShapeseekError::invalid_argument("format keys must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_key("").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for shapeseek operations.
#[derive(Error, Debug)]
pub enum ShapeseekError {
    /// I/O errors (reading inputs, lexicon files, WordNet dictionaries).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The lexical database could not answer a lookup.
    #[error("Lexical lookup error: {0}")]
    Lexical(String),

    /// Processing a node of the input structure failed.
    #[error("Traversal error at '{pointer}': {message}")]
    Traversal { pointer: String, message: String },

    /// Worker threads or other host resources could not be obtained.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with [`ShapeseekError`].
pub type Result<T> = std::result::Result<T, ShapeseekError>;

impl ShapeseekError {
    /// Create a new lexical lookup error.
    pub fn lexical<S: Into<String>>(msg: S) -> Self {
        ShapeseekError::Lexical(msg.into())
    }

    /// Create a new traversal error for the node at `pointer`.
    pub fn traversal<P: Into<String>, S: Into<String>>(pointer: P, msg: S) -> Self {
        ShapeseekError::Traversal {
            pointer: pointer.into(),
            message: msg.into(),
        }
    }

    /// Create a new resource exhausted error.
    pub fn resource_exhausted<S: Into<String>>(msg: S) -> Self {
        ShapeseekError::ResourceExhausted(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ShapeseekError::InvalidArgument(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ShapeseekError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ShapeseekError::Other(msg.into())
    }
}
