//! Command line argument parsing for the shapeseek CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::sizer::SizingPolicy;

/// shapeseek - find records of a given shape in nested JSON
#[derive(Parser, Debug, Clone)]
#[command(name = "shapeseek")]
#[command(about = "Schema-tolerant record extraction from nested JSON")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ShapeseekArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ShapeseekArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract every mapping that covers the given keys
    Extract(ExtractArgs),

    /// Show the synonyms resolved for a word
    Synonyms(SynonymsArgs),

    /// Score two keys with token sort ratio
    Similarity(SimilarityArgs),

    /// Show the worker count chosen for this host
    Workers(WorkersArgs),
}

/// Where synonyms come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SynonymSourceArgs {
    /// Synonym override file (JSON object of word -> [synonyms])
    #[arg(short = 's', long = "synonyms", value_name = "FILE")]
    pub synonyms: Option<PathBuf>,

    /// In-memory lexicon file (JSON array of synonym groups)
    #[arg(long, value_name = "FILE", conflicts_with = "wordnet")]
    pub lexicon: Option<PathBuf>,

    /// WordNet dict directory; an unusable directory is logged and ignored
    #[arg(long, value_name = "DIR")]
    pub wordnet: Option<PathBuf>,
}

/// Arguments for extraction
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Input JSON file, or '-' for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Format key a record must cover (repeatable)
    #[arg(short = 'k', long = "key", value_name = "KEY")]
    pub keys: Vec<String>,

    #[command(flatten)]
    pub source: SynonymSourceArgs,

    /// Traverse in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for parallel mode (implies --parallel)
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Fail on the first node that cannot be processed
    #[arg(long)]
    pub fail_fast: bool,

    /// Maximum nesting depth
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Extraction config file (JSON); flags override its values
    #[arg(short = 'c', long, value_name = "FILE", env = "SHAPESEEK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Include JSON Pointers of matches in the output
    #[arg(long)]
    pub with_pointers: bool,
}

/// Arguments for synonym lookup
#[derive(Parser, Debug, Clone)]
pub struct SynonymsArgs {
    /// Word to look up
    #[arg(value_name = "WORD")]
    pub word: String,

    #[command(flatten)]
    pub source: SynonymSourceArgs,
}

/// Arguments for similarity scoring
#[derive(Parser, Debug, Clone)]
pub struct SimilarityArgs {
    #[arg(value_name = "A")]
    pub a: String,

    #[arg(value_name = "B")]
    pub b: String,
}

/// Arguments for worker sizing
#[derive(Parser, Debug, Clone)]
pub struct WorkersArgs {
    /// How cores and memory combine
    #[arg(short, long, default_value = "larger")]
    pub policy: PolicyArg,

    /// Upper bound on the worker count
    #[arg(long, default_value = "256")]
    pub max_workers: usize,
}

/// Sizing policies accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Larger,
    Smaller,
    CoresOnly,
}

impl From<PolicyArg> for SizingPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Larger => SizingPolicy::Larger,
            PolicyArg::Smaller => SizingPolicy::Smaller,
            PolicyArg::CoresOnly => SizingPolicy::CoresOnly,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ExtractArgs {
    /// Whether parallel traversal was requested
    pub fn parallel_requested(&self) -> bool {
        self.parallel || self.threads.is_some()
    }
}
