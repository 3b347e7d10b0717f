//! Per-format analyzers.

mod delimited;
mod document;
mod header;
mod html;
mod json;

pub use delimited::{NO_PATIENT_DATA_WARNING, detect_csv_delimiter};
pub use document::NO_SUBJECT_WARNING;
pub use header::{
    ColumnMatches, HeaderPattern, PATIENT_ID_PATTERNS, PATIENT_NAME_PATTERNS, VISIT_PATTERNS,
};
pub use html::{NO_SURVEY_DATA_WARNING, SURVEY_VARIABLES, find_embedded_document};

use crate::error::{AnalysisError, Result};
use crate::format::FileFormat;
use crate::result::FormatAnalysis;

/// Runs the analyzer matching `format`.
///
/// [`detect_format`](crate::detect_format) never yields `Unknown`; reaching
/// that arm is reported as an error rather than an empty success.
pub(crate) fn analyze_format(format: FileFormat, content: &str) -> Result<FormatAnalysis> {
    match format {
        FileFormat::Csv => Ok(delimited::analyze_csv(content)),
        FileFormat::Json => json::analyze_json(content),
        FileFormat::Hl7 => document::analyze_clinical_document(content),
        FileFormat::Html => html::analyze_html_survey(content),
        FileFormat::Unknown => Err(AnalysisError::NoAnalyzer { format }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNSUPPORTED_FORMAT;

    #[test]
    fn test_unknown_format_is_an_error() {
        let err = analyze_format(FileFormat::Unknown, "a,b\n1,2").unwrap_err();
        assert!(matches!(err, AnalysisError::NoAnalyzer { format: FileFormat::Unknown }));
        assert_eq!(err.code(), UNSUPPORTED_FORMAT);
        assert!(err.is_expected());
    }
}
