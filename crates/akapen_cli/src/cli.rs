//! CLI argument definitions

use std::path::PathBuf;

use akapen_core::DocumentFormat;
use clap::{Parser, ValueEnum};

/// Akapen - proofreading linter for technical documents
#[derive(Parser)]
#[command(name = "akapen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files, directories or glob patterns to lint
    #[arg(required_unless_present = "sentence")]
    pub inputs: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "conf", value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// Input format (plain, wiki, markdown, rest, review)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<DocumentFormat>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ResultFormat::Plain)]
    pub result_format: ResultFormat,

    /// Lint this text instead of files
    #[arg(short, long, value_name = "TEXT", conflicts_with = "inputs")]
    pub sentence: Option<String>,

    /// Document language when no configuration file is found
    #[arg(short = 'L', long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Number of errors tolerated before exiting with a failure
    #[arg(short, long, default_value_t = 1)]
    pub limit: usize,

    /// Measure performance
    #[arg(long)]
    pub timings: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultFormat {
    Plain,
    Json,
}
