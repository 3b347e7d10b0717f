use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use intake_analysis::{AnalysisResult, ConfigUpdate, ImportAnalyzer};

use crate::cli::AnalyzeArgs;
use crate::summary::apply_table_style;

/// Outcome of the `analyze` command.
#[derive(Debug)]
pub enum AnalyzeOutcome {
    /// The file was analyzed; the result may still be unsuccessful.
    Analyzed(AnalysisResult),
    /// The file exceeds the configured maximum size and was not analyzed.
    TooLarge { size: u64, limit: u64 },
}

impl AnalyzeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Analyzed(result) if result.success())
    }
}

pub fn run_formats() {
    let analyzer = ImportAnalyzer::default();
    let mut table = Table::new();
    table.set_header(vec!["Format", "Extensions"]);
    apply_table_style(&mut table);
    for format in analyzer.supported_formats() {
        let extensions = format
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![format.to_string(), extensions]);
    }
    println!("{table}");
}

/// Builds an analyzer from the config file (if any), then command-line flags.
pub fn build_analyzer(args: &AnalyzeArgs) -> Result<ImportAnalyzer> {
    let mut analyzer = ImportAnalyzer::default();

    if let Some(path) = &args.config {
        analyzer.update_config(load_config_update(path)?);
    }

    let flags = ConfigUpdate {
        max_file_size: args.max_file_size.clone(),
        validation_level: args.validation_level.clone(),
    };
    if !flags.is_empty() {
        analyzer.update_config(flags);
    }

    Ok(analyzer)
}

fn load_config_update(path: &Path) -> Result<ConfigUpdate> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeOutcome> {
    let path = &args.file;
    let span = info_span!("analyze", path = %path.display());
    let _guard = span.enter();

    let analyzer = build_analyzer(args)?;
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let size = bytes.len() as u64;
    if !analyzer.validate_byte_len(size) {
        let limit = analyzer.config().max_file_size_bytes();
        warn!(size, limit, "file too large to analyze");
        return Ok(AnalyzeOutcome::TooLarge { size, limit });
    }

    let content = String::from_utf8_lossy(&bytes);
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = analyzer.analyze_file_content(&content, &filename);
    info!(success = result.success(), "analysis finished");
    Ok(AnalyzeOutcome::Analyzed(result))
}
