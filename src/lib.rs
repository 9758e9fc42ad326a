//! # shapeseek
//!
//! Schema-tolerant record extraction from nested JSON.
//!
//! Given a parsed document and a list of desired field names, shapeseek
//! returns every object whose keys cover all of those names. Keys are compared
//! by fuzzy similarity and by synonym equivalence, so a request for `name` and
//! `address` also finds `{"Name": .., "addr": ..}`.
//!
//! ```
//! use serde_json::json;
//! use shapeseek::prelude::*;
//!
//! let data = json!({"people": [{"Name": "Ann", "addr": "1 Main St"}, {"age": 3}]});
//! let engine = StructuralExtractor::default();
//! let found = engine
//!     .extract(&data, &["name", "address"], &SynonymOverrides::new())
//!     .unwrap();
//! assert_eq!(found, vec![&data["people"][0]]);
//! ```
//!
//! ## Components
//!
//! - [`similarity`] - token sort ratio scoring
//! - [`lexicon`] - lexical databases (WordNet, in-memory, empty)
//! - [`synonym`] - synonym resolution with caller overrides
//! - [`matcher`] - key matching and the coverage rule
//! - [`extraction`] - sequential and parallel traversal
//! - [`sizer`] - worker pool sizing from host resources

pub mod cli;
pub mod error;
pub mod extraction;
pub mod lexicon;
pub mod matcher;
pub mod similarity;
pub mod sizer;
pub mod synonym;

pub mod prelude {
    pub use crate::error::{Result, ShapeseekError};
    pub use crate::extraction::{
        ErrorPolicy, ExecutionMode, ExtractionConfig, ExtractionReport, StructuralExtractor,
    };
    pub use crate::lexicon::{
        EmptyLexicon, InMemoryLexicon, LexicalDatabase, Synset, WordNetDatabase,
    };
    pub use crate::matcher::{CoverageMatcher, SIMILARITY_THRESHOLD};
    pub use crate::similarity::token_sort_ratio;
    pub use crate::sizer::{SizingPolicy, WorkerSizer};
    pub use crate::synonym::{SynonymOverrides, SynonymResolver};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
