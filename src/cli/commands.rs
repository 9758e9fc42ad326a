//! Command implementations for the shapeseek CLI.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, ShapeseekError};
use crate::extraction::{ErrorPolicy, ExecutionMode, ExtractionConfig, StructuralExtractor};
use crate::lexicon::{EmptyLexicon, InMemoryLexicon, LexicalDatabase, WordNetDatabase};
use crate::matcher::{CoverageMatcher, SIMILARITY_THRESHOLD};
use crate::similarity::token_sort_ratio;
use crate::sizer::WorkerSizer;
use crate::synonym::{SynonymOverrides, SynonymResolver};

/// Execute a CLI command.
pub fn execute_command(args: ShapeseekArgs) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => extract(extract_args, &args),
        Command::Synonyms(synonyms_args) => show_synonyms(synonyms_args, &args),
        Command::Similarity(similarity_args) => show_similarity(similarity_args, &args),
        Command::Workers(workers_args) => show_workers(workers_args, &args),
    }
}

/// Extract covering records from a JSON document.
fn extract(args: &ExtractArgs, cli_args: &ShapeseekArgs) -> Result<()> {
    let start = Instant::now();

    let data = read_input(&args.input)?;
    let resolver = SynonymResolver::new(open_lexicon(&args.source)?);
    let overrides = load_overrides(&args.source)?;
    let config = build_config(args)?;

    info!(
        "Extracting [{}] from {} with the {} lexicon",
        args.keys.join(", "),
        args.input.display(),
        resolver.lexicon().name()
    );

    let engine = StructuralExtractor::new(CoverageMatcher::new(resolver), config)?;
    let report = engine.extract_report(&data, &args.keys, &overrides)?;

    let matches = report
        .matches
        .iter()
        .map(|m| ExtractedRecord {
            pointer: args.with_pointers.then_some(m.pointer.as_str()),
            record: m.value,
        })
        .collect();

    output_extraction(
        &ExtractionOutput {
            keys: args.keys.clone(),
            matches,
            failures: report.failures.clone(),
            nodes_visited: engine.metrics().nodes_visited,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Print the synonyms a format key resolves to.
fn show_synonyms(args: &SynonymsArgs, cli_args: &ShapeseekArgs) -> Result<()> {
    let resolver = SynonymResolver::new(open_lexicon(&args.source)?);
    let overrides = load_overrides(&args.source)?;

    let mut synonyms: Vec<String> = resolver.resolve(&args.word, &overrides).into_iter().collect();
    synonyms.sort();

    output_result(
        &format!("Synonyms of '{}'", args.word),
        &SynonymsOutput {
            word: args.word.clone(),
            lexicon: resolver.lexicon().name().to_string(),
            synonyms,
        },
        cli_args,
    )
}

/// Print the token sort ratio of two keys.
fn show_similarity(args: &SimilarityArgs, cli_args: &ShapeseekArgs) -> Result<()> {
    let score = token_sort_ratio(&args.a, &args.b);

    output_result(
        "Token sort ratio",
        &SimilarityOutput {
            a: args.a.clone(),
            b: args.b.clone(),
            score,
            threshold: SIMILARITY_THRESHOLD,
            matches: score >= SIMILARITY_THRESHOLD,
        },
        cli_args,
    )
}

/// Print the worker count the sizer picks on this host.
fn show_workers(args: &WorkersArgs, cli_args: &ShapeseekArgs) -> Result<()> {
    let sizer = WorkerSizer::default()
        .with_policy(args.policy.into())
        .with_max_workers(args.max_workers);
    let snapshot = sizer.snapshot();

    output_result(
        "Worker sizing",
        &WorkersOutput {
            policy: sizer.policy(),
            cores: snapshot.cores,
            available_memory_gib: snapshot.available_memory_gib,
            max_workers: args.max_workers,
            workers: sizer.optimal_parallelism(),
        },
        cli_args,
    )
}

/// Read a JSON document from a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<Value> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        return Ok(serde_json::from_reader(stdin.lock())?);
    }

    let file = File::open(path).map_err(|e| {
        ShapeseekError::invalid_argument(format!(
            "Cannot open input '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn open_lexicon(source: &SynonymSourceArgs) -> Result<Arc<dyn LexicalDatabase>> {
    if let Some(path) = &source.lexicon {
        return Ok(Arc::new(InMemoryLexicon::load_from_file(path)?));
    }
    if let Some(dir) = &source.wordnet {
        // Loaded by `SynonymResolver::new`, which logs an unusable directory.
        return Ok(Arc::new(WordNetDatabase::open(dir)));
    }
    Ok(Arc::new(EmptyLexicon::new()))
}

fn load_overrides(source: &SynonymSourceArgs) -> Result<SynonymOverrides> {
    match &source.synonyms {
        Some(path) => SynonymOverrides::load_from_file(path),
        None => Ok(SynonymOverrides::new()),
    }
}

/// Merge command line flags over the config file, if any.
fn build_config(args: &ExtractArgs) -> Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractionConfig::from_json_file(path)?,
        None => ExtractionConfig::default(),
    };

    if args.parallel_requested() {
        config = config.with_mode(ExecutionMode::Parallel);
    }
    if let Some(threads) = args.threads {
        config = config.with_thread_pool_size(threads);
    }
    if args.fail_fast {
        config = config.with_error_policy(ErrorPolicy::Propagate);
    }
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;

    fn extract_args(argv: &[&str]) -> ExtractArgs {
        let mut full = vec!["shapeseek", "extract"];
        full.extend_from_slice(argv);
        match ShapeseekArgs::try_parse_from(full).unwrap().command {
            Command::Extract(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&extract_args(&["in.json", "-k", "name"])).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"mode": "sequential", "max_depth": 10}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = build_config(&extract_args(&[
            "in.json",
            "--config",
            &path,
            "--threads",
            "2",
            "--fail-fast",
        ]))
        .unwrap();

        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert_eq!(config.thread_pool_size, Some(2));
        assert_eq!(config.error_policy, ErrorPolicy::Propagate);
        assert_eq!(config.max_depth, 10);
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(matches!(err, ShapeseekError::InvalidArgument(_)));
    }

    #[test]
    fn test_read_input_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"b": 1, "a": 2}}"#).unwrap();
        let value = read_input(file.path()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_open_lexicon_defaults_to_empty() {
        let lexicon = open_lexicon(&SynonymSourceArgs::default()).unwrap();
        assert_eq!(lexicon.name(), "empty");
    }

    #[test]
    fn test_missing_wordnet_dir_falls_back_to_overrides() {
        let source = SynonymSourceArgs {
            wordnet: Some("/nonexistent/wordnet/dict".into()),
            ..Default::default()
        };
        let lexicon = open_lexicon(&source).unwrap();
        assert_eq!(lexicon.name(), "wordnet");

        let resolver = SynonymResolver::new(lexicon);
        let overrides = SynonymOverrides::new().with("zip", ["postcode"]);
        let synonyms = resolver.resolve("zip", &overrides);
        assert_eq!(synonyms.len(), 1);
        assert!(synonyms.contains("postcode"));
    }
}
