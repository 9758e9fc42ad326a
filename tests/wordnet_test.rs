//! Integration tests for the WordNet reader over fixture dict files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use shapeseek::error::Result;
use shapeseek::extraction::StructuralExtractor;
use shapeseek::lexicon::{LexicalDatabase, PartOfSpeech, WordNetDatabase};
use shapeseek::matcher::CoverageMatcher;
use shapeseek::synonym::{SynonymOverrides, SynonymResolver};
use tempfile::TempDir;

const LICENSE: &str = "  1 This software and database is being provided to you, the LICENSEE\n\
                       \x20 2 by Princeton University under the following license.\n";

/// Write `data.<suffix>` and `index.<suffix>` for the given synsets.
///
/// Offsets are the real byte positions of each synset line.
fn write_pos(dir: &Path, suffix: &str, pos: char, synsets: &[&[&str]]) -> Vec<u64> {
    let mut data = String::from(LICENSE);
    let mut offsets = Vec::new();
    let mut index: BTreeMap<String, Vec<u64>> = BTreeMap::new();

    for words in synsets {
        let offset = data.len() as u64;
        offsets.push(offset);

        let members: Vec<String> = words.iter().map(|w| format!("{w} 0")).collect();
        data.push_str(&format!(
            "{offset:08} 00 {pos} {:02x} {} 000 | fixture gloss\n",
            words.len(),
            members.join(" ")
        ));

        for word in *words {
            let lemma = word.split('(').next().unwrap_or(word).to_lowercase();
            index.entry(lemma).or_default().push(offset);
        }
    }

    let mut index_file = String::from(LICENSE);
    for (lemma, lemma_offsets) in &index {
        let rendered: Vec<String> = lemma_offsets.iter().map(|o| format!("{o:08}")).collect();
        index_file.push_str(&format!(
            "{lemma} {pos} {n} 1 @ {n} 0 {}\n",
            rendered.join(" "),
            n = lemma_offsets.len()
        ));
    }

    fs::write(dir.join(format!("data.{suffix}")), data).unwrap();
    fs::write(dir.join(format!("index.{suffix}")), index_file).unwrap();
    offsets
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_pos(
        dir.path(),
        "noun",
        'n',
        &[
            &["address", "computer_address"],
            &["address", "speech"],
            &["zip_code", "postcode", "postal_code"],
            &["goose"],
        ],
    );
    write_pos(dir.path(), "adj", 's', &[&["happy", "glad(p)"]]);
    fs::write(dir.path().join("noun.exc"), "geese goose\n").unwrap();
    dir
}

fn lemmas(db: &WordNetDatabase, word: &str) -> Result<Vec<Vec<String>>> {
    Ok(db
        .synsets_of(word)?
        .iter()
        .map(|s| s.lemma_names().to_vec())
        .collect())
}

#[test]
fn test_lookup_reads_synsets_by_offset() -> Result<()> {
    let dir = fixture();
    let db = WordNetDatabase::load(dir.path())?;

    let synsets = db.synsets_of("address")?;
    assert_eq!(synsets.len(), 2);
    assert!(synsets.iter().all(|s| s.pos() == Some(PartOfSpeech::Noun)));
    assert_eq!(
        lemmas(&db, "address")?,
        vec![vec!["address", "computer_address"], vec!["address", "speech"]]
    );

    Ok(())
}

#[test]
fn test_synset_ids_are_offsets() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let offsets = write_pos(dir.path(), "noun", 'n', &[&["city"], &["town", "city"]]);
    let db = WordNetDatabase::load(dir.path())?;

    let ids: Vec<String> = db
        .synsets_of("city")?
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    let expected: Vec<String> = offsets.iter().map(|o| format!("{o:08}")).collect();
    assert_eq!(ids, expected);

    Ok(())
}

#[test]
fn test_morphy_and_normalization() -> Result<()> {
    let dir = fixture();
    let db = WordNetDatabase::load(dir.path())?;

    assert_eq!(lemmas(&db, "addresses")?, lemmas(&db, "address")?);
    assert_eq!(
        lemmas(&db, "  Zip Code ")?,
        vec![vec!["zip_code", "postcode", "postal_code"]]
    );
    assert_eq!(lemmas(&db, "geese")?, vec![vec!["goose"]]);
    assert!(db.synsets_of("unknownword")?.is_empty());

    Ok(())
}

#[test]
fn test_adjective_markers_are_stripped() -> Result<()> {
    let dir = fixture();
    let db = WordNetDatabase::load(dir.path())?;

    let synsets = db.synsets_of("glad")?;
    assert_eq!(synsets.len(), 1);
    assert_eq!(synsets[0].pos(), Some(PartOfSpeech::Adjective));
    assert_eq!(synsets[0].lemma_names(), &["happy", "glad"]);

    Ok(())
}

#[test]
fn test_initialize_is_idempotent() -> Result<()> {
    let dir = fixture();
    let db = Arc::new(WordNetDatabase::open(dir.path()));
    assert!(!db.is_initialized());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            std::thread::spawn(move || db.initialize())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap()?;
    }

    assert!(db.is_initialized());
    db.initialize()?;
    assert_eq!(db.synsets_of("goose")?.len(), 1);

    Ok(())
}

#[test]
fn test_directory_without_dict_files_fails() {
    let dir = TempDir::new().unwrap();
    assert!(WordNetDatabase::load(dir.path()).is_err());
}

#[test]
fn test_resolver_falls_back_when_wordnet_is_missing() {
    let resolver = SynonymResolver::new(Arc::new(WordNetDatabase::open("/nonexistent/dict")));
    let overrides = SynonymOverrides::new().with("zip", ["postcode"]);

    let synonyms = resolver.resolve("zip", &overrides);
    assert_eq!(synonyms.len(), 1);
    assert!(synonyms.contains("postcode"));
}

#[test]
fn test_extraction_with_wordnet_synonyms() -> Result<()> {
    let dir = fixture();
    let resolver = SynonymResolver::new(Arc::new(WordNetDatabase::load(dir.path())?));
    let engine = StructuralExtractor::sequential(CoverageMatcher::new(resolver));

    let data = json!({
        "shipments": [
            {"postcode": "N1 9GU", "speech": "hello"},
            {"city": "London"}
        ]
    });

    let found = engine.extract(&data, &["zip code", "address"], &SynonymOverrides::new())?;
    assert_eq!(found, vec![&data["shipments"][0]]);

    Ok(())
}
