//! WordNet database reader.
//!
//! Reads the standard WordNet `dict/` layout:
//!
//! - `index.{noun,verb,adj,adv}` map each lemma to the byte offsets of its
//!   synsets in the matching data file. These are loaded into memory.
//! - `data.{noun,verb,adj,adv}` hold one synset per line, starting at the
//!   byte offset named in the index. These are memory-mapped and read on
//!   demand.
//! - `{noun,verb,adj,adv}.exc` list irregular inflections used by
//!   [`morphy`](crate::lexicon::morphy). They are optional.
//!
//! Loading happens in [`LexicalDatabase::initialize`], guarded so that
//! repeated or concurrent calls load the files once.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::debug;
use memmap2::{Mmap, MmapOptions};
use parking_lot::RwLock;

use crate::error::{Result, ShapeseekError};
use crate::lexicon::morphy::{self, ExceptionMap};
use crate::lexicon::{LexicalDatabase, PartOfSpeech, Synset};

/// Lemma -> synset offsets for one part of speech.
type LemmaIndex = AHashMap<String, Vec<u64>>;

/// WordNet lexical database backed by files in a `dict/` directory.
#[derive(Debug)]
pub struct WordNetDatabase {
    dict_dir: PathBuf,
    state: RwLock<Option<Arc<LoadedWordNet>>>,
}

#[derive(Debug)]
struct LoadedWordNet {
    parts: Vec<PosTables>,
}

#[derive(Debug)]
struct PosTables {
    pos: PartOfSpeech,
    lemmas: LemmaIndex,
    exceptions: ExceptionMap,
    data: Mmap,
}

impl WordNetDatabase {
    /// Point the database at a WordNet `dict/` directory. Nothing is read
    /// until [`initialize`](LexicalDatabase::initialize) is called.
    pub fn open<P: AsRef<Path>>(dict_dir: P) -> Self {
        Self {
            dict_dir: dict_dir.as_ref().to_path_buf(),
            state: RwLock::new(None),
        }
    }

    /// Open and initialize in one step.
    pub fn load<P: AsRef<Path>>(dict_dir: P) -> Result<Self> {
        let db = Self::open(dict_dir);
        db.initialize()?;
        Ok(db)
    }

    pub fn dict_dir(&self) -> &Path {
        &self.dict_dir
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().is_some()
    }

    fn loaded(&self) -> Result<Arc<LoadedWordNet>> {
        self.state.read().clone().ok_or_else(|| {
            ShapeseekError::lexical(format!(
                "WordNet database at '{}' is not initialized",
                self.dict_dir.display()
            ))
        })
    }

    fn load_tables(&self) -> Result<LoadedWordNet> {
        if !self.dict_dir.is_dir() {
            return Err(ShapeseekError::lexical(format!(
                "WordNet directory '{}' does not exist",
                self.dict_dir.display()
            )));
        }

        let mut parts = Vec::new();
        for pos in PartOfSpeech::ALL {
            let suffix = pos.file_suffix();
            let index_path = self.dict_dir.join(format!("index.{suffix}"));
            let data_path = self.dict_dir.join(format!("data.{suffix}"));

            if !index_path.is_file() || !data_path.is_file() {
                debug!("WordNet files for '{suffix}' not found, skipping");
                continue;
            }

            let lemmas = parse_index(&std::fs::read_to_string(&index_path)?);
            let data = map_file(&data_path)?;

            let exc_path = self.dict_dir.join(format!("{suffix}.exc"));
            let exceptions = if exc_path.is_file() {
                morphy::parse_exceptions(&std::fs::read_to_string(&exc_path)?)
            } else {
                ExceptionMap::new()
            };

            debug!(
                "Loaded WordNet {suffix}: {} lemmas, {} exceptions",
                lemmas.len(),
                exceptions.len()
            );

            parts.push(PosTables {
                pos,
                lemmas,
                exceptions,
                data,
            });
        }

        if parts.is_empty() {
            return Err(ShapeseekError::lexical(format!(
                "No WordNet index/data files found in '{}'",
                self.dict_dir.display()
            )));
        }

        Ok(LoadedWordNet { parts })
    }
}

impl LexicalDatabase for WordNetDatabase {
    fn initialize(&self) -> Result<()> {
        if self.state.read().is_some() {
            return Ok(());
        }

        let mut state = self.state.write();
        if state.is_some() {
            return Ok(());
        }
        *state = Some(Arc::new(self.load_tables()?));
        Ok(())
    }

    fn synsets_of(&self, word: &str) -> Result<Vec<Synset>> {
        let wordnet = self.loaded()?;
        let lemma = normalize_lemma(word);
        if lemma.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = AHashSet::new();
        let mut synsets = Vec::new();

        for tables in &wordnet.parts {
            let forms = morphy::base_forms(&lemma, tables.pos, &tables.exceptions, |form| {
                tables.lemmas.contains_key(form)
            });

            for form in forms {
                let Some(offsets) = tables.lemmas.get(&form) else {
                    continue;
                };
                for &offset in offsets {
                    if !seen.insert((tables.pos, offset)) {
                        continue;
                    }
                    synsets.push(read_synset(&tables.data, tables.pos, offset)?);
                }
            }
        }

        Ok(synsets)
    }

    fn name(&self) -> &str {
        "wordnet"
    }
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: WordNet data files are read-only inputs that are not modified while mapped.
    let mmap = unsafe {
        MmapOptions::new().map(&file).map_err(|e| {
            ShapeseekError::lexical(format!("Failed to mmap '{}': {}", path.display(), e))
        })?
    };
    Ok(mmap)
}

/// Lowercase, trim and join multi-word lemmas with `_`.
pub fn normalize_lemma(word: &str) -> String {
    word.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// Parse an `index.*` file.
///
/// Line layout: `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt
/// tagsense_cnt synset_offset [synset_offset...]`. License lines start with a
/// space and malformed lines are skipped.
pub fn parse_index(content: &str) -> LemmaIndex {
    let mut index = LemmaIndex::new();
    for line in content.lines() {
        if line.starts_with(' ') || line.is_empty() {
            continue;
        }
        if let Some((lemma, offsets)) = parse_index_line(line) {
            index.insert(lemma, offsets);
        }
    }
    index
}

fn parse_index_line(line: &str) -> Option<(String, Vec<u64>)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }

    let synset_cnt: usize = fields[2].parse().ok()?;
    let p_cnt: usize = fields[3].parse().ok()?;
    let first_offset = 4 + p_cnt + 2;
    let offsets = fields.get(first_offset..first_offset + synset_cnt)?;

    let offsets = offsets
        .iter()
        .map(|o| o.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some((fields[0].to_string(), offsets))
}

fn read_synset(data: &[u8], pos: PartOfSpeech, offset: u64) -> Result<Synset> {
    let start = usize::try_from(offset)
        .ok()
        .filter(|&s| s < data.len())
        .ok_or_else(|| {
            ShapeseekError::lexical(format!(
                "Synset offset {offset} is outside data.{}",
                pos.file_suffix()
            ))
        })?;

    let rest = &data[start..];
    let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let line = std::str::from_utf8(&rest[..end])
        .map_err(|e| ShapeseekError::lexical(format!("Invalid UTF-8 in synset {offset}: {e}")))?;

    let lemmas = parse_data_line(line).ok_or_else(|| {
        ShapeseekError::lexical(format!(
            "Malformed synset at offset {offset} in data.{}",
            pos.file_suffix()
        ))
    })?;

    Ok(Synset::new(format!("{offset:08}"), Some(pos), lemmas))
}

/// Extract the lemma names from a `data.*` line.
///
/// Line layout: `synset_offset lex_filenum ss_type w_cnt word lex_id [word
/// lex_id...] p_cnt ...`, with `w_cnt` in hexadecimal.
pub fn parse_data_line(line: &str) -> Option<Vec<String>> {
    let mut fields = line.split_whitespace();
    let _offset = fields.next()?;
    let _lex_filenum = fields.next()?;
    let _ss_type = fields.next()?;
    let w_cnt = usize::from_str_radix(fields.next()?, 16).ok()?;

    let mut lemmas = Vec::with_capacity(w_cnt);
    for _ in 0..w_cnt {
        let word = fields.next()?;
        let _lex_id = fields.next()?;
        lemmas.push(strip_adjective_marker(word).to_string());
    }
    Some(lemmas)
}

/// Remove syntactic markers such as `(a)`, `(p)` and `(ip)` from adjectives.
fn strip_adjective_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') => &word[..idx],
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_line() {
        let (lemma, offsets) =
            parse_index_line("address n 2 3 @ ~ + 2 1 08491826 06257217").unwrap();
        assert_eq!(lemma, "address");
        assert_eq!(offsets, vec![8491826, 6257217]);
    }

    #[test]
    fn test_parse_index_skips_license_and_malformed() {
        let content = "  1 This software and database is being provided\n\
                       happy a 2 1 & 2 2 01148283 01048406\n\
                       broken n x\n";
        let index = parse_index(content);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("happy"), Some(&vec![1148283, 1048406]));
    }

    #[test]
    fn test_parse_data_line() {
        let line = "01148283 00 a 03 happy 0 felicitous 0 glad(p) 0 001 & 01149494 a 0000 | enjoying";
        assert_eq!(
            parse_data_line(line).unwrap(),
            vec!["happy", "felicitous", "glad"]
        );
    }

    #[test]
    fn test_parse_data_line_hex_count() {
        let words: Vec<String> = (0..10).map(|i| format!("w{i} 0")).collect();
        let line = format!("00000001 00 n 0a {} 000 | gloss", words.join(" "));
        assert_eq!(parse_data_line(&line).unwrap().len(), 10);
    }

    #[test]
    fn test_normalize_lemma() {
        assert_eq!(normalize_lemma("  Ice Cream "), "ice_cream");
        assert_eq!(normalize_lemma("ADDRESS"), "address");
    }

    #[test]
    fn test_lookup_before_initialize_fails() {
        let db = WordNetDatabase::open("/nonexistent/wordnet/dict");
        assert!(!db.is_initialized());
        assert!(matches!(db.synsets_of("happy"), Err(ShapeseekError::Lexical(_))));
        assert!(db.initialize().is_err());
    }
}
