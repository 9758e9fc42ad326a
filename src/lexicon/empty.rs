//! A lexical database that knows no words.

use crate::error::Result;
use crate::lexicon::{LexicalDatabase, Synset};

/// Lexicon with no entries. Used when no lexical database is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl EmptyLexicon {
    pub fn new() -> Self {
        Self
    }
}

impl LexicalDatabase for EmptyLexicon {
    fn synsets_of(&self, _word: &str) -> Result<Vec<Synset>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "empty"
    }
}
