//! Command implementations for the Permdex CLI.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::analysis::analyzer::Analyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PermdexConfig;
use crate::document::trec;
use crate::document::tsv::{FieldTsvReader, FieldTsvWriter, TokenTsvReader, TokenTsvWriter};
use crate::error::Result;
use crate::lexical::builder::InvertedIndexBuilder;
use crate::lexical::inverted_index::InvertedIndex;
use crate::permuterm::index::PermutermIndex;

/// Execute a CLI command.
pub fn execute_command(args: PermdexArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Parse(parse_args) => parse(parse_args, &args),
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args, config, &args),
        Command::BuildIndex(build_args) => build_index(build_args, &args),
        Command::Query(query_args) => query(query_args, config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, config, &args),
    }
}

fn load_config(args: &PermdexArgs) -> Result<PermdexConfig> {
    match &args.config {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            PermdexConfig::from_file(path)
        }
        None => Ok(PermdexConfig::default()),
    }
}

fn open_output(target: &str) -> Result<Box<dyn Write>> {
    if target == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let path = Path::new(target);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

/// Extract the documents of a collection into a field file.
fn parse(args: &ParseArgs, cli_args: &PermdexArgs) -> Result<()> {
    let files = trec::collection_files(&args.input)?;
    let mut writer = FieldTsvWriter::new(open_output(&args.output)?)?;

    let mut documents = 0u64;
    let mut skipped = 0u64;
    for file in &files {
        let (docs, dropped) = trec::read_file(file)?;
        log::debug!("{}: {} documents", file.display(), docs.len());
        for doc in &docs {
            writer.write(doc)?;
        }
        documents += docs.len() as u64;
        skipped += dropped;
    }
    writer.flush()?;

    output_result(
        "Parsed collection",
        &ParseSummary {
            files: files.len() as u64,
            documents,
            skipped,
            output: args.output.clone(),
        },
        cli_args,
    )
}

/// Analyze a field file into a token file.
fn tokenize(args: &TokenizeArgs, mut config: PermdexConfig, cli_args: &PermdexArgs) -> Result<()> {
    if let Some(fields) = &args.fields {
        config.tokenizer.fields = fields
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
    }
    if args.no_stop {
        config.tokenizer.stopwords = false;
    }
    if args.no_apos_rule {
        config.tokenizer.apostrophe_rule = false;
    }

    let analyzer = Analyzer::from_config(&config.tokenizer);
    let reader = FieldTsvReader::from_path(&args.input, &config.tokenizer.fields)?;
    let mut writer = TokenTsvWriter::new(open_output(&args.output)?)?;

    let mut documents = 0u64;
    for doc in reader {
        writer.write(&analyzer.analyze_document(&doc?))?;
        documents += 1;
    }
    writer.flush()?;

    output_result(
        "Tokenized documents",
        &TokenizeSummary {
            documents,
            output: args.output.clone(),
        },
        cli_args,
    )
}

/// Build an inverted index from a token file.
fn build_index(args: &BuildIndexArgs, cli_args: &PermdexArgs) -> Result<()> {
    let start_time = Instant::now();

    let mut builder = InvertedIndexBuilder::new();
    builder.try_add_documents(TokenTsvReader::from_path(&args.input)?)?;
    let (index, stats) = builder.build();
    index.save(&args.output, args.compact)?;

    output_result(
        "Index built",
        &BuildSummary {
            stats,
            output: args.output.display().to_string(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Answer one wildcard query on stdout.
fn query(args: &QueryArgs, config: PermdexConfig, cli_args: &PermdexArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let lines = run_query(args, config, cli_args.output_format, &mut out)?;
    out.flush()?;
    log::info!("query '{}': {} result lines", args.query, lines);
    Ok(())
}

/// Answer one wildcard query, writing matched terms or result lines to
/// `out`. `--name` and `--rankval` override the configured run label and
/// rank. Returns the number of terms or result lines produced.
pub fn run_query(
    args: &QueryArgs,
    mut config: PermdexConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<usize> {
    if let Some(name) = &args.name {
        config.trec.run_label = name.clone();
    }
    if let Some(rank) = &args.rankval {
        config.trec.rank = rank.clone();
    }

    let index = InvertedIndex::load(&args.inverted)?;
    let permuterm = PermutermIndex::new(index, config.permuterm.clone())?;

    if args.terms_only {
        let terms = permuterm.matching_terms(&args.query)?;
        match format {
            OutputFormat::Text => {
                for term in &terms {
                    writeln!(out, "{term}")?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &terms)?;
                writeln!(out)?;
            }
        }
        Ok(terms.len())
    } else {
        let hits = permuterm.resolve(&args.query)?;
        output_hits(out, &hits, &config.trec, format)?;
        Ok(hits.len())
    }
}

/// Show statistics of an index and its permuterm tree.
fn show_stats(args: &StatsArgs, config: PermdexConfig, cli_args: &PermdexArgs) -> Result<()> {
    let index = InvertedIndex::load(&args.inverted)?;
    let stats = index.stats();
    let permuterm = PermutermIndex::new(index, config.permuterm)?;
    permuterm.tree().check_invariants()?;

    output_result(
        &format!("Statistics for {}", args.inverted.display()),
        &StatsSummary {
            index: stats,
            permuterm: permuterm.stats(),
        },
        cli_args,
    )
}
