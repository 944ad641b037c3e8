//! Output formatting for CLI commands.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PermdexArgs};
use crate::config::TrecConfig;
use crate::error::Result;
use crate::lexical::inverted_index::IndexStats;
use crate::permuterm::index::{PermutermStats, QueryHit};

/// Result structure for collection parsing.
#[derive(Debug, Serialize)]
pub struct ParseSummary {
    pub files: u64,
    pub documents: u64,
    pub skipped: u64,
    pub output: String,
}

/// Result structure for tokenization.
#[derive(Debug, Serialize)]
pub struct TokenizeSummary {
    pub documents: u64,
    pub output: String,
}

/// Result structure for index construction.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    #[serde(flatten)]
    pub stats: IndexStats,
    pub output: String,
    pub duration_ms: u64,
}

/// Combined index and tree statistics.
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub index: IndexStats,
    pub permuterm: PermutermStats,
}

/// One Boolean-retrieval result line:
/// `<queryId> <iteration> <documentID> <rank> <score> <runLabel>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrecRecord<'a> {
    pub query_id: &'a str,
    pub iteration: &'a str,
    pub doc_id: &'a str,
    pub rank: &'a str,
    pub score: f64,
    pub run_label: &'a str,
}

impl<'a> TrecRecord<'a> {
    pub fn from_hit(hit: &QueryHit<'a>, config: &'a TrecConfig) -> Self {
        TrecRecord {
            query_id: &config.query_id,
            iteration: &config.iteration,
            doc_id: hit.doc_id,
            rank: &config.rank,
            score: config.score,
            run_label: &config.run_label,
        }
    }
}

impl fmt::Display for TrecRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing `.0` on whole scores.
        write!(
            f,
            "{} {} {} {} {:?} {}",
            self.query_id, self.iteration, self.doc_id, self.rank, self.score, self.run_label
        )
    }
}

/// Write one result line per hit. Returns the number of lines written.
pub fn write_trec<W: Write + ?Sized>(out: &mut W, hits: &[QueryHit<'_>], config: &TrecConfig) -> Result<usize> {
    for hit in hits {
        writeln!(out, "{}", TrecRecord::from_hit(hit, config))?;
    }
    Ok(hits.len())
}

/// Write query hits in the selected format.
pub fn output_hits<W: Write + ?Sized>(
    out: &mut W,
    hits: &[QueryHit<'_>],
    config: &TrecConfig,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            write_trec(out, hits, config)?;
        }
        OutputFormat::Json => {
            let records: Vec<TrecRecord<'_>> = hits
                .iter()
                .map(|hit| TrecRecord::from_hit(hit, config))
                .collect();
            serde_json::to_writer(&mut *out, &records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Output a summary in the specified format.
///
/// Text summaries go to stderr so that stdout only carries results; JSON
/// summaries go to stdout.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &PermdexArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Text => {
            if args.verbosity() > 0 {
                eprintln!("{}", format_text(message, result)?);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(result)?);
        }
    }
    Ok(())
}

/// Render `message` followed by one `key: value` line per field, nested
/// objects flattened with dotted keys.
pub fn format_text<T: Serialize>(message: &str, result: &T) -> Result<String> {
    let value = serde_json::to_value(result)?;
    let mut lines = vec![message.to_string()];
    flatten_into(&mut lines, "", &value);
    Ok(lines.join("\n"))
}

fn flatten_into(lines: &mut Vec<String>, prefix: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(lines, &name, inner);
            }
        }
        serde_json::Value::Null => lines.push(format!("  {prefix}: -")),
        serde_json::Value::String(s) => lines.push(format!("  {prefix}: {s}")),
        other => lines.push(format!("  {prefix}: {other}")),
    }
}
