//! Synonym resolution.
//!
//! [`SynonymResolver`] merges two sources of equivalent words: the lemma names
//! a [`LexicalDatabase`] attaches to every sense of a word, and a caller-owned
//! [`SynonymOverrides`] table. Lexical failures, including a panicking
//! lookup, are recovered locally and produce an empty base set.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{Result, ShapeseekError};
use crate::lexicon::{EmptyLexicon, LexicalDatabase};

/// Caller-supplied synonyms that supplement lexical database lookups.
///
/// Words are matched case-insensitively; the synonym strings are used
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymOverrides {
    entries: Vec<(String, Vec<String>)>,
}

impl SynonymOverrides {
    /// Create an empty override table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add synonyms for `word`. Adding the same word twice keeps both lists.
    pub fn insert<W, I, S>(&mut self, word: W, synonyms: I)
    where
        W: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((word.into(), synonyms.into_iter().map(Into::into).collect()));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<W, I, S>(mut self, word: W, synonyms: I) -> Self
    where
        W: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(word, synonyms);
        self
    }

    /// All override synonyms for `word`, in table order.
    pub fn lookup<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a String> + 'a {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .filter(move |(key, _)| key.to_lowercase() == word)
            .flat_map(|(_, synonyms)| synonyms.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load overrides from a JSON object mapping words to synonym arrays:
    ///
    /// ```json
    /// { "address": ["addr", "location"], "phone": ["tel"] }
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to read synonym overrides '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to parse synonym overrides '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse overrides from a JSON object, keeping the object's key order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut overrides = Self::new();
        for (word, value) in map {
            let synonyms: Vec<String> = serde_json::from_value(value)?;
            overrides.insert(word, synonyms);
        }
        Ok(overrides)
    }
}

impl<W, S> FromIterator<(W, Vec<S>)> for SynonymOverrides
where
    W: Into<String>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (W, Vec<S>)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (word, synonyms) in iter {
            overrides.insert(word, synonyms);
        }
        overrides
    }
}

/// Resolves the set of strings considered equivalent to a word.
#[derive(Debug, Clone)]
pub struct SynonymResolver {
    lexicon: Arc<dyn LexicalDatabase>,
}

impl Default for SynonymResolver {
    fn default() -> Self {
        Self::new(Arc::new(EmptyLexicon::new()))
    }
}

impl SynonymResolver {
    /// Create a resolver and initialize its lexical database.
    ///
    /// Initialization failures are logged; lookups then yield no lexical
    /// synonyms.
    pub fn new(lexicon: Arc<dyn LexicalDatabase>) -> Self {
        if let Err(e) = lexicon.initialize() {
            warn!(
                "Lexical database '{}' unavailable, continuing without it: {e}",
                lexicon.name()
            );
        }
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Arc<dyn LexicalDatabase> {
        &self.lexicon
    }

    /// Lexical synonyms of `word` merged with its overrides.
    pub fn resolve(&self, word: &str, overrides: &SynonymOverrides) -> HashSet<String> {
        let mut synonyms = self.lexical_synonyms(word);
        synonyms.extend(overrides.lookup(word).cloned());
        synonyms
    }

    fn lexical_synonyms(&self, word: &str) -> HashSet<String> {
        let lookup = panic::catch_unwind(AssertUnwindSafe(|| self.lexicon.synsets_of(word)));
        match lookup {
            Ok(Ok(synsets)) => synsets
                .iter()
                .flat_map(|s| s.lemma_names().iter().cloned())
                .collect(),
            Ok(Err(e)) => {
                debug!(
                    "Lexical lookup for '{word}' in '{}' failed: {e}",
                    self.lexicon.name()
                );
                HashSet::new()
            }
            Err(payload) => {
                warn!(
                    "Lexical lookup for '{word}' in '{}' panicked: {}",
                    self.lexicon.name(),
                    panic_message(payload.as_ref())
                );
                HashSet::new()
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string payload"
    }
}
