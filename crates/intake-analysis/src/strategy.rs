//! Import strategy advice and import time estimation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recommended way for the import wizard to treat a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStrategy {
    /// Everything belongs to one patient.
    #[default]
    SinglePatient,
    /// One patient with several visits. Caller-selectable.
    MultipleVisits,
    /// Several patients imported together. Caller-selectable.
    MultiplePatients,
    /// A handful of patients imported as one batch.
    BatchImport,
    /// Many patients; the user picks what to import.
    Interactive,
}

impl ImportStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SinglePatient => "single_patient",
            Self::MultipleVisits => "multiple_visits",
            Self::MultiplePatients => "multiple_patients",
            Self::BatchImport => "batch_import",
            Self::Interactive => "interactive",
        }
    }
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest patient count still treated as a single patient.
const SINGLE_PATIENT_MAX: usize = 1;

/// Largest patient count still imported as a batch.
const BATCH_IMPORT_MAX: usize = 9;

/// Maps a patient count to the default recommended strategy.
///
/// - `0..=1` → [`ImportStrategy::SinglePatient`]
/// - `2..=9` → [`ImportStrategy::BatchImport`]
/// - `10..` → [`ImportStrategy::Interactive`]
pub fn determine_strategy(patients_count: usize) -> ImportStrategy {
    match patients_count {
        0..=SINGLE_PATIENT_MAX => ImportStrategy::SinglePatient,
        2..=BATCH_IMPORT_MAX => ImportStrategy::BatchImport,
        _ => ImportStrategy::Interactive,
    }
}

/// Record counts of an analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    pub patients_count: usize,
    pub visits_count: usize,
    pub observations_count: usize,
}

impl RecordCounts {
    pub fn new(patients_count: usize, visits_count: usize, observations_count: usize) -> Self {
        Self {
            patients_count,
            visits_count,
            observations_count,
        }
    }

    /// Total record volume.
    pub fn total(&self) -> usize {
        self.patients_count
            .saturating_add(self.visits_count)
            .saturating_add(self.observations_count)
    }
}

/// Expected duration of a full import, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ImportTime {
    #[default]
    #[serde(rename = "Instant")]
    Instant,
    #[serde(rename = "< 1 minute")]
    UnderOneMinute,
    #[serde(rename = "1-2 minutes")]
    OneToTwoMinutes,
    #[serde(rename = "2-5 minutes")]
    TwoToFiveMinutes,
    #[serde(rename = "5-15 minutes")]
    FiveToFifteenMinutes,
    #[serde(rename = "15+ minutes")]
    OverFifteenMinutes,
}

impl ImportTime {
    pub fn label(self) -> &'static str {
        match self {
            Self::Instant => "Instant",
            Self::UnderOneMinute => "< 1 minute",
            Self::OneToTwoMinutes => "1-2 minutes",
            Self::TwoToFiveMinutes => "2-5 minutes",
            Self::FiveToFifteenMinutes => "5-15 minutes",
            Self::OverFifteenMinutes => "15+ minutes",
        }
    }
}

impl fmt::Display for ImportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive upper bounds of each bucket, smallest first.
const IMPORT_TIME_BUCKETS: [(usize, ImportTime); 5] = [
    (0, ImportTime::Instant),
    (10, ImportTime::UnderOneMinute),
    (100, ImportTime::OneToTwoMinutes),
    (1_000, ImportTime::TwoToFiveMinutes),
    (10_000, ImportTime::FiveToFifteenMinutes),
];

/// Buckets the total record volume into an import duration.
pub fn estimate_import_time(counts: RecordCounts) -> ImportTime {
    let total = counts.total();
    IMPORT_TIME_BUCKETS
        .iter()
        .find(|(upper, _)| total <= *upper)
        .map_or(ImportTime::OverFifteenMinutes, |&(_, time)| time)
}
