//! Command line argument parsing for the Permdex CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Permdex - inverted index construction and permuterm wildcard queries
#[derive(Parser, Debug, Clone)]
#[command(name = "permdex")]
#[command(about = "Build an inverted index and answer single-wildcard queries against it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PermdexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file (JSON); command line flags take precedence
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Output format for summaries and results
    #[arg(short = 'f', long = "format", default_value = "text")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PermdexArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract document fields from an SGML collection into a field file
    Parse(ParseArgs),

    /// Analyze document fields into a token file
    Tokenize(TokenizeArgs),

    /// Build an inverted index from a token file
    #[command(name = "build-index")]
    BuildIndex(BuildIndexArgs),

    /// Run a wildcard query against an index
    Query(QueryArgs),

    /// Show index and permuterm tree statistics
    Stats(StatsArgs),
}

/// Arguments for parsing a collection
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Collection file, or a directory searched recursively
    #[arg(long, value_name = "FILE_OR_DIR")]
    pub input: PathBuf,

    /// Field TSV to write (`-` for stdout)
    #[arg(long, default_value = "-")]
    pub output: String,
}

/// Arguments for tokenizing a field file
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    /// Field TSV (header row with a `docno` column)
    #[arg(long, value_name = "FIELDS_TSV")]
    pub input: PathBuf,

    /// Token TSV to write (`-` for stdout)
    #[arg(long, default_value = "-")]
    pub output: String,

    /// Fields to analyze (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Keep stopwords
    #[arg(long)]
    pub no_stop: bool,

    /// Only strip apostrophes, never collapse `<stem>'<letter>`
    #[arg(long)]
    pub no_apos_rule: bool,
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct BuildIndexArgs {
    /// Token TSV (header: docno<TAB>tokens)
    #[arg(long, value_name = "TOKENS_TSV")]
    pub input: PathBuf,

    /// Index JSON to write
    #[arg(long, default_value = "inverted_index.json")]
    pub output: PathBuf,

    /// Write compact JSON (no indentation)
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for querying
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Index JSON written by build-index
    #[arg(long, value_name = "INDEX_JSON")]
    pub inverted: PathBuf,

    /// Pattern with at most one `*` (e.g. pre*suf, pre*, *suf, term)
    #[arg(long)]
    pub query: String,

    /// Run label for the last output column
    #[arg(long)]
    pub name: Option<String>,

    /// Value of the rank column
    #[arg(long)]
    pub rankval: Option<String>,

    /// Print matching terms instead of result lines
    #[arg(long)]
    pub terms_only: bool,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Index JSON written by build-index
    #[arg(long, value_name = "INDEX_JSON")]
    pub inverted: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text: result lines and `key: value` summaries
    Text,
    /// JSON
    Json,
}
