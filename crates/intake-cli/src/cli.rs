//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "Clinical Intake - Analyze clinical data files before import",
    long_about = "Analyze a clinical data file before importing it.\n\n\
                  Detects CSV, JSON, HL7 composition and HTML survey files, counts\n\
                  patients, visits and observations, and recommends an import strategy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a file and report its format, record counts and strategy.
    Analyze(AnalyzeArgs),

    /// List the supported file formats.
    Formats,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to the file to analyze.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the analysis result as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Maximum accepted file size (e.g. 10MB, 512KB).
    #[arg(long = "max-file-size", value_name = "SIZE")]
    pub max_file_size: Option<String>,

    /// Validation level passed through with the analysis.
    #[arg(long = "validation-level", value_name = "LEVEL")]
    pub validation_level: Option<String>,

    /// JSON file with a partial analyzer configuration.
    ///
    /// Keys: `maxFileSize`, `validationLevel`. Command-line flags win over
    /// values from this file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
