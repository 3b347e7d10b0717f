//! The import analyzer: the engine's public entry point.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::analyzers::analyze_format;
use crate::config::{AnalyzerConfig, ConfigUpdate};
use crate::error::{AnalysisError, Result, UNSUPPORTED_FORMAT};
use crate::format::{FileFormat, detect_format};
use crate::result::{AnalysisResult, FormatAnalysis, create_error_result};

/// Prefix of messages for failures outside the format taxonomy.
const UNEXPECTED_ERROR_PREFIX: &str = "Error analyzing file";

/// Characterizes clinical data files before import.
///
/// Each instance owns its configuration, so analyzers with different limits
/// can coexist. Analysis itself only reads the configuration and has no side
/// effects.
#[derive(Debug, Clone, Default)]
pub struct ImportAnalyzer {
    config: AnalyzerConfig,
}

impl ImportAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Merges a partial update into this analyzer's configuration.
    pub fn update_config(&mut self, update: ConfigUpdate) {
        tracing::debug!(?update, "updating analyzer configuration");
        self.config.merge(update);
    }

    /// Formats this analyzer handles, in sniffing priority order.
    pub fn supported_formats(&self) -> &[FileFormat] {
        self.config.supported_formats()
    }

    /// Returns true if `content` fits within the configured maximum size.
    pub fn validate_file_size(&self, content: &str) -> bool {
        self.validate_byte_len(content.len() as u64)
    }

    /// Returns true if `size` bytes fit within the configured maximum size.
    pub fn validate_byte_len(&self, size: u64) -> bool {
        let limit = self.config.max_file_size_bytes();
        if size > limit {
            tracing::warn!(size, limit, "content exceeds maximum file size");
        }
        size <= limit
    }

    /// Detects the format of `content`. See [`detect_format`].
    pub fn detect_format(&self, content: &str, filename: &str) -> Option<FileFormat> {
        detect_format(content, filename)
    }

    /// Analyzes `content` named `filename`.
    ///
    /// Never panics and never returns an error: every failure is reported on
    /// the returned [`AnalysisResult`].
    pub fn analyze_file_content(&self, content: &str, filename: &str) -> AnalysisResult {
        let _span = tracing::info_span!("analyze_file", filename).entered();

        let Some(format) = self.detect_format(content, filename) else {
            tracing::warn!("unsupported file format");
            return create_error_result(
                UNSUPPORTED_FORMAT,
                &format!("Unsupported file format: {filename}"),
            )
            .for_file(FileFormat::Unknown, filename);
        };

        guarded(format, filename, || analyze_format(format, content))
    }
}

/// Runs `analyze` behind the failure boundary and builds the result.
///
/// A panic becomes [`AnalysisError::Panicked`]. Errors outside the format
/// taxonomy also carry [`ErrorDetails`](crate::ErrorDetails).
fn guarded<F>(format: FileFormat, filename: &str, analyze: F) -> AnalysisResult
where
    F: FnOnce() -> Result<FormatAnalysis>,
{
    let outcome = catch_unwind(AssertUnwindSafe(analyze)).unwrap_or_else(|payload| {
        Err(AnalysisError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    });

    match outcome {
        Ok(analysis) => {
            let result = AnalysisResult::from_analysis(format, filename, analysis);
            tracing::info!(
                %format,
                patients = result.patients_count(),
                visits = result.visits_count(),
                observations = result.observations_count(),
                strategy = %result.recommended_strategy(),
                "analysis complete"
            );
            result
        }
        Err(error) if error.is_expected() => {
            tracing::warn!(%format, %error, "analysis failed");
            create_error_result(error.code(), &error.to_string()).for_file(format, filename)
        }
        Err(error) => {
            tracing::error!(%format, %error, "unexpected analysis failure");
            let message = format!("{UNEXPECTED_ERROR_PREFIX}: {error}");
            create_error_result(error.code(), &message)
                .for_file(format, filename)
                .with_error_details(error.to_string(), filename)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "analyzer panicked".to_string())
}
