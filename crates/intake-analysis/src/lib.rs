//! Import analysis for clinical data files.
//!
//! Given the text of a file and its name, this crate determines the file's
//! format, counts patient-, visit- and observation-like records, recommends
//! an import strategy and estimates import time, all without a declared
//! schema and without writing anything.
//!
//! # Formats
//!
//! - **CSV**: comma or semicolon delimited text with heuristic patient,
//!   name and visit column discovery
//! - **JSON**: exports with top-level `patients`, `visits` and
//!   `observations` arrays
//! - **HL7**: composition documents with a `subject` and `section` entries
//! - **HTML**: survey pages embedding a composition in a `<script>` block
//!
//! # Example
//!
//! ```
//! use intake_analysis::{FileFormat, ImportAnalyzer, ImportStrategy};
//!
//! let analyzer = ImportAnalyzer::default();
//! let result = analyzer.analyze_file_content("Patient ID,Gender,Age\nPAT001,M,45", "test.csv");
//!
//! assert!(result.success());
//! assert_eq!(result.format(), FileFormat::Csv);
//! assert_eq!(result.patients_count(), 1);
//! assert_eq!(result.recommended_strategy(), ImportStrategy::SinglePatient);
//! ```

mod analyzer;
mod analyzers;
mod config;
mod error;
mod format;
mod result;
mod sniff;
mod strategy;

// === Engine ===
pub use analyzer::ImportAnalyzer;

// === Configuration ===
pub use config::{
    AnalyzerConfig, ConfigUpdate, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILE_SIZE_BYTES,
    DEFAULT_VALIDATION_LEVEL, parse_file_size,
};

// === Error Types ===
pub use error::{ANALYSIS_ERROR, AnalysisError, INVALID_JSON, UNSUPPORTED_FORMAT};

// === Format Detection ===
pub use format::{FileFormat, SUPPORTED_FORMATS, detect_format};
pub use sniff::{is_csv_content, is_hl7_content, is_html_content, is_json_content};

// === Format Analyzers ===
pub use analyzers::{
    ColumnMatches, HeaderPattern, NO_PATIENT_DATA_WARNING, NO_SUBJECT_WARNING,
    NO_SURVEY_DATA_WARNING, PATIENT_ID_PATTERNS, PATIENT_NAME_PATTERNS, SURVEY_VARIABLES,
    VISIT_PATTERNS, detect_csv_delimiter, find_embedded_document,
};

// === Results ===
pub use result::{
    AnalysisIssue, AnalysisResult, ErrorDetails, MAX_PATIENT_PREVIEWS, PatientPreview,
    create_error_result,
};

// === Strategy & Timing ===
pub use strategy::{
    ImportStrategy, ImportTime, RecordCounts, determine_strategy, estimate_import_time,
};
