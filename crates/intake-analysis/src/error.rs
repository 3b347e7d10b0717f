//! Error types for import analysis.

use thiserror::Error;

use crate::format::FileFormat;

/// Error code reported when no format matches the file.
pub const UNSUPPORTED_FORMAT: &str = "UNSUPPORTED_FORMAT";

/// Error code reported when a JSON payload cannot be parsed.
pub const INVALID_JSON: &str = "INVALID_JSON";

/// Error code reported for failures outside the format taxonomy.
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";

/// Errors that can occur while a format analyzer inspects content.
///
/// These never cross the public boundary as-is: the aggregator converts
/// each one into an error entry on the [`AnalysisResult`](crate::AnalysisResult).
#[derive(Debug, Error)]
pub enum AnalysisError {
    // === Parse Errors ===
    /// Payload is not valid JSON.
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// Payload is JSON but not shaped like the expected document.
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// No analyzer exists for the detected format.
    #[error("no analyzer for format '{format}'")]
    NoAnalyzer { format: FileFormat },

    // === Unexpected Errors ===
    /// Analyzer panicked; the payload message is preserved.
    #[error("{message}")]
    Panicked { message: String },
}

impl AnalysisError {
    /// Returns the public error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } | Self::InvalidDocument { .. } => INVALID_JSON,
            Self::NoAnalyzer { .. } => UNSUPPORTED_FORMAT,
            Self::Panicked { .. } => ANALYSIS_ERROR,
        }
    }

    /// Returns true for errors that belong to the format taxonomy.
    ///
    /// Unexpected errors carry diagnostic details on the result.
    pub fn is_expected(&self) -> bool {
        self.code() != ANALYSIS_ERROR
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidJson { source }
    }
}

/// Result type for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AnalysisError = json_err.into();
        assert_eq!(err.code(), INVALID_JSON);
        assert!(err.is_expected());

        let err = AnalysisError::InvalidDocument {
            reason: "root is not an object".to_string(),
        };
        assert_eq!(err.code(), INVALID_JSON);

        let err = AnalysisError::Panicked {
            message: "boom".to_string(),
        };
        assert_eq!(err.code(), ANALYSIS_ERROR);
        assert!(!err.is_expected());
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::InvalidDocument {
            reason: "root is not an object".to_string(),
        };
        assert_eq!(err.to_string(), "invalid document: root is not an object");
    }
}
