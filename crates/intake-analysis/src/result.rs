//! Analysis result model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::FileFormat;
use crate::strategy::{
    ImportStrategy, ImportTime, RecordCounts, determine_strategy, estimate_import_time,
};

/// Maximum number of patient previews kept on a result.
pub const MAX_PATIENT_PREVIEWS: usize = 10;

/// Identifier and display name of one detected patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPreview {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PatientPreview {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// One error entry on a failed analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisIssue {
    pub code: String,
    pub message: String,
}

/// Diagnostics attached when analysis failed unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub filename: String,
}

/// Outcome of a format analyzer, before strategy and timing are attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FormatAnalysis {
    pub counts: RecordCounts,
    pub patients: Vec<PatientPreview>,
    pub warnings: Vec<String>,
}

impl FormatAnalysis {
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(warning = %message, "analysis warning");
        self.warnings.push(message);
    }

    /// Adds a preview unless the preview list is full.
    pub fn preview(&mut self, patient: PatientPreview) {
        if self.patients.len() < MAX_PATIENT_PREVIEWS {
            self.patients.push(patient);
        }
    }
}

/// The single output value of an analysis.
///
/// Built once per call and never mutated afterwards. `success` is true
/// exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    success: bool,
    format: FileFormat,
    filename: String,
    patients_count: usize,
    visits_count: usize,
    observations_count: usize,
    patients: Vec<PatientPreview>,
    recommended_strategy: ImportStrategy,
    estimated_import_time: ImportTime,
    warnings: Vec<String>,
    errors: Vec<AnalysisIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<ErrorDetails>,
}

impl AnalysisResult {
    /// Builds a successful result from an analyzer outcome.
    pub(crate) fn from_analysis(
        format: FileFormat,
        filename: &str,
        analysis: FormatAnalysis,
    ) -> Self {
        let counts = analysis.counts;
        Self {
            success: true,
            format,
            filename: filename.to_string(),
            patients_count: counts.patients_count,
            visits_count: counts.visits_count,
            observations_count: counts.observations_count,
            patients: analysis.patients,
            recommended_strategy: determine_strategy(counts.patients_count),
            estimated_import_time: estimate_import_time(counts),
            warnings: analysis.warnings,
            errors: Vec::new(),
            error_details: None,
        }
    }

    /// Stamps the file identity on an error result.
    pub(crate) fn for_file(mut self, format: FileFormat, filename: &str) -> Self {
        self.format = format;
        self.filename = filename.to_string();
        self
    }

    /// Attaches diagnostics for an unexpected failure.
    pub(crate) fn with_error_details(mut self, message: String, filename: &str) -> Self {
        self.error_details = Some(ErrorDetails {
            message,
            timestamp: Utc::now(),
            filename: filename.to_string(),
        });
        self
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn patients_count(&self) -> usize {
        self.patients_count
    }

    pub fn visits_count(&self) -> usize {
        self.visits_count
    }

    pub fn observations_count(&self) -> usize {
        self.observations_count
    }

    pub fn counts(&self) -> RecordCounts {
        RecordCounts::new(
            self.patients_count,
            self.visits_count,
            self.observations_count,
        )
    }

    pub fn patients(&self) -> &[PatientPreview] {
        &self.patients
    }

    pub fn recommended_strategy(&self) -> ImportStrategy {
        self.recommended_strategy
    }

    pub fn estimated_import_time(&self) -> ImportTime {
        self.estimated_import_time
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[AnalysisIssue] {
        &self.errors
    }

    pub fn error_details(&self) -> Option<&ErrorDetails> {
        self.error_details.as_ref()
    }

    pub fn has_multiple_patients(&self) -> bool {
        self.patients_count > 1
    }

    pub fn has_multiple_visits(&self) -> bool {
        self.visits_count > 1
    }

    /// Strategies a caller may offer: the recommendation first, then the
    /// multi-visit and multi-patient variants the counts allow.
    pub fn available_strategies(&self) -> Vec<ImportStrategy> {
        let mut strategies = vec![self.recommended_strategy];
        if self.has_multiple_visits() {
            strategies.push(ImportStrategy::MultipleVisits);
        }
        if self.has_multiple_patients() {
            strategies.push(ImportStrategy::MultiplePatients);
        }
        strategies
    }
}

/// Builds a failed result carrying one error.
///
/// Counts are zero, the format is unknown and no warnings are attached.
pub fn create_error_result(code: &str, message: &str) -> AnalysisResult {
    AnalysisResult {
        success: false,
        format: FileFormat::Unknown,
        filename: String::new(),
        patients_count: 0,
        visits_count: 0,
        observations_count: 0,
        patients: Vec::new(),
        recommended_strategy: ImportStrategy::default(),
        estimated_import_time: ImportTime::default(),
        warnings: Vec::new(),
        errors: vec![AnalysisIssue {
            code: code.to_string(),
            message: message.to_string(),
        }],
        error_details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNSUPPORTED_FORMAT;

    #[test]
    fn test_create_error_result() {
        let result = create_error_result(UNSUPPORTED_FORMAT, "Unsupported file format");
        assert!(!result.success());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, UNSUPPORTED_FORMAT);
        assert!(result.warnings().is_empty());
        assert!(result.error_details().is_none());
        assert_eq!(result.format(), FileFormat::Unknown);
    }

    #[test]
    fn test_from_analysis_attaches_strategy_and_time() {
        let analysis = FormatAnalysis {
            counts: RecordCounts::new(5, 0, 5),
            ..FormatAnalysis::default()
        };
        let result = AnalysisResult::from_analysis(FileFormat::Csv, "test.csv", analysis);

        assert!(result.success());
        assert!(result.errors().is_empty());
        assert_eq!(result.recommended_strategy(), ImportStrategy::BatchImport);
        assert_eq!(result.estimated_import_time(), ImportTime::UnderOneMinute);
    }

    #[test]
    fn test_preview_cap() {
        let mut analysis = FormatAnalysis::default();
        for i in 0..(MAX_PATIENT_PREVIEWS + 5) {
            analysis.preview(PatientPreview::new(format!("P{i}"), None));
        }
        assert_eq!(analysis.patients.len(), MAX_PATIENT_PREVIEWS);
    }

    #[test]
    fn test_available_strategies() {
        let analysis = FormatAnalysis {
            counts: RecordCounts::new(3, 4, 10),
            ..FormatAnalysis::default()
        };
        let result = AnalysisResult::from_analysis(FileFormat::Csv, "visits.csv", analysis);
        assert_eq!(
            result.available_strategies(),
            vec![
                ImportStrategy::BatchImport,
                ImportStrategy::MultipleVisits,
                ImportStrategy::MultiplePatients,
            ]
        );

        let single = AnalysisResult::from_analysis(
            FileFormat::Hl7,
            "doc.hl7",
            FormatAnalysis {
                counts: RecordCounts::new(1, 1, 3),
                ..FormatAnalysis::default()
            },
        );
        assert_eq!(
            single.available_strategies(),
            vec![ImportStrategy::SinglePatient]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = create_error_result("X", "y");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["patientsCount"], 0);
        assert_eq!(value["recommendedStrategy"], "single_patient");
        assert_eq!(value["estimatedImportTime"], "Instant");
        assert!(value.get("errorDetails").is_none());
    }
}
