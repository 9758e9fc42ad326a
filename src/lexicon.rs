//! Lexical databases used as a source of synonyms.
//!
//! A [`LexicalDatabase`] answers one question: which senses (synsets) does a
//! word have, and which lemma names belong to each of them. Three backends are
//! provided:
//!
//! - [`EmptyLexicon`] - knows no words; synonyms then come only from caller
//!   overrides.
//! - [`InMemoryLexicon`] - synonym groups held in memory, optionally loaded
//!   from a JSON file.
//! - [`WordNetDatabase`] - reads a WordNet `dict/` directory from disk.
//!
//! Implementations must be safe to share between worker threads. Backends that
//! need expensive setup do it in [`LexicalDatabase::initialize`], which must be
//! idempotent.

pub mod empty;
pub mod memory;
pub mod morphy;
pub mod wordnet;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use empty::EmptyLexicon;
pub use memory::InMemoryLexicon;
pub use wordnet::WordNetDatabase;

/// Part of speech of a synset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    /// All parts of speech, in lookup order.
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    /// File suffix used by WordNet (`index.noun`, `data.adj`, ...).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
        }
    }
}

/// One sense of a word together with all lemmas that express it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synset {
    id: String,
    pos: Option<PartOfSpeech>,
    lemmas: Vec<String>,
}

impl Synset {
    /// Create a synset.
    pub fn new<S: Into<String>>(id: S, pos: Option<PartOfSpeech>, lemmas: Vec<String>) -> Self {
        Self {
            id: id.into(),
            pos,
            lemmas,
        }
    }

    /// Backend-specific identifier (a byte offset for WordNet, a group index
    /// for in-memory lexicons).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pos(&self) -> Option<PartOfSpeech> {
        self.pos
    }

    /// Lemma names attached to this sense.
    pub fn lemma_names(&self) -> &[String] {
        &self.lemmas
    }
}

/// A read-only lexical database.
pub trait LexicalDatabase: Send + Sync + Debug {
    /// Prepare the database for lookups.
    ///
    /// Calling this more than once, or concurrently, must be harmless.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// All senses of `word`. Unknown words yield an empty list.
    fn synsets_of(&self, word: &str) -> Result<Vec<Synset>>;

    /// Short name used in logs and CLI output.
    fn name(&self) -> &str;
}
