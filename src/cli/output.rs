//! Output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{OutputFormat, ShapeseekArgs};
use crate::error::Result;
use crate::extraction::TraversalFailure;
use crate::sizer::SizingPolicy;

/// A matched record as printed by `extract`.
#[derive(Debug, Serialize)]
pub struct ExtractedRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<&'a str>,
    pub record: &'a Value,
}

/// Result structure for extraction.
#[derive(Debug, Serialize)]
pub struct ExtractionOutput<'a> {
    pub keys: Vec<String>,
    pub matches: Vec<ExtractedRecord<'a>>,
    pub failures: Vec<TraversalFailure>,
    pub nodes_visited: u64,
    pub duration_ms: u64,
}

/// Result structure for synonym lookup.
#[derive(Debug, Serialize)]
pub struct SynonymsOutput {
    pub word: String,
    pub lexicon: String,
    pub synonyms: Vec<String>,
}

/// Result structure for similarity scoring.
#[derive(Debug, Serialize)]
pub struct SimilarityOutput {
    pub a: String,
    pub b: String,
    pub score: u8,
    pub threshold: u8,
    pub matches: bool,
}

/// Result structure for worker sizing.
#[derive(Debug, Serialize)]
pub struct WorkersOutput {
    pub policy: SizingPolicy,
    pub cores: usize,
    pub available_memory_gib: usize,
    pub max_workers: usize,
    pub workers: usize,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &ShapeseekArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output extraction results. Human output prints each record as JSON.
pub fn output_extraction(result: &ExtractionOutput<'_>, args: &ShapeseekArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(result, args);
    }

    if args.verbosity() > 0 {
        println!(
            "Found {} records covering [{}]",
            result.matches.len(),
            result.keys.join(", ")
        );
        println!();
    }

    for (i, record) in result.matches.iter().enumerate() {
        if args.verbosity() > 0 {
            match record.pointer {
                Some(pointer) => println!("Record {} at '{}':", i + 1, pointer),
                None => println!("Record {}:", i + 1),
            }
        }
        let json = if args.pretty {
            serde_json::to_string_pretty(record.record)?
        } else {
            serde_json::to_string(record.record)?
        };
        println!("{json}");
    }

    if !result.failures.is_empty() && args.verbosity() > 0 {
        println!();
        println!("Skipped {} subtrees:", result.failures.len());
        for failure in &result.failures {
            println!("  {}: {}", display_pointer(&failure.pointer), failure.message);
        }
    }

    if args.verbosity() > 1 {
        println!();
        println!(
            "Visited {} nodes in {} ms",
            result.nodes_visited, result.duration_ms
        );
    }
    Ok(())
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &ShapeseekArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match &value {
        Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(&value)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ShapeseekArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

fn display_pointer(pointer: &str) -> &str {
    if pointer.is_empty() { "(root)" } else { pointer }
}
