//! In-memory lexicon built from synonym groups.

use std::path::Path;

use ahash::AHashMap;

use crate::error::{Result, ShapeseekError};
use crate::lexicon::{LexicalDatabase, Synset};

/// Lexicon where every synonym group is one synset.
///
/// Lookups are case-insensitive; lemma names keep the case they were given.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLexicon {
    groups: Vec<Vec<String>>,
    /// Lowercased term -> indices into `groups`.
    index: AHashMap<String, Vec<usize>>,
}

impl InMemoryLexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lexicon from synonym groups. Empty groups are ignored.
    pub fn from_synonym_groups(groups: Vec<Vec<String>>) -> Self {
        let mut lexicon = Self::new();
        for group in groups {
            lexicon.add_synonym_group(group);
        }
        lexicon
    }

    /// Load synonym groups from a JSON file.
    ///
    /// The file must contain an array of groups, each an array of terms:
    /// ```json
    /// [
    ///   ["address", "location", "residence"],
    ///   ["phone", "telephone", "tel"]
    /// ]
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to read lexicon file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let groups: Vec<Vec<String>> = serde_json::from_str(&content).map_err(|e| {
            ShapeseekError::config(format!(
                "Failed to parse lexicon JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_synonym_groups(groups))
    }

    /// Add a group of terms that are all synonyms of each other.
    pub fn add_synonym_group(&mut self, terms: Vec<String>) {
        if terms.is_empty() {
            return;
        }

        let group_id = self.groups.len();
        for term in &terms {
            let ids = self.index.entry(term.to_lowercase()).or_default();
            if !ids.contains(&group_id) {
                ids.push(group_id);
            }
        }
        self.groups.push(terms);
    }

    /// Number of synonym groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl LexicalDatabase for InMemoryLexicon {
    fn synsets_of(&self, word: &str) -> Result<Vec<Synset>> {
        let Some(ids) = self.index.get(&word.to_lowercase()) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .map(|&id| Synset::new(id.to_string(), None, self.groups[id].clone()))
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
