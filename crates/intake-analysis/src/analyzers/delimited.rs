//! Delimited text analysis.

use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::result::{FormatAnalysis, PatientPreview};
use crate::sniff::strip_bom;
use crate::strategy::RecordCounts;

use super::header::{ColumnMatches, normalize_header};

/// Warning emitted when no patient column is found.
pub const NO_PATIENT_DATA_WARNING: &str = "No patient data detected - will use single patient mode";

/// Picks the column separator from the header line.
///
/// Counts `,` and `;` in the first line; semicolon wins only when strictly
/// more frequent.
pub fn detect_csv_delimiter(content: &str) -> char {
    let header = strip_bom(content).lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas { ';' } else { ',' }
}

/// Analyzes delimited text.
///
/// Never fails: structural problems become warnings so the caller still gets
/// a strategy recommendation.
pub(crate) fn analyze_csv(content: &str) -> FormatAnalysis {
    let mut analysis = FormatAnalysis::default();

    let lines: Vec<&str> = strip_bom(content)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        analysis.warn("CSV file is empty");
        analysis.warn(NO_PATIENT_DATA_WARNING);
        return analysis;
    }

    let delimiter = detect_csv_delimiter(lines[0]);
    let cleaned = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(cleaned.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(normalize_header).collect(),
        Err(error) => {
            tracing::warn!(%error, "unreadable CSV header");
            analysis.warn(format!("Could not read CSV header: {error}"));
            analysis.warn(NO_PATIENT_DATA_WARNING);
            return analysis;
        }
    };

    let columns = ColumnMatches::detect(&headers);
    tracing::debug!(
        delimiter = %delimiter,
        columns = headers.len(),
        patient_column = ?columns.patient_id,
        visit_column = ?columns.visit,
        "CSV header analyzed"
    );

    let mut tally = RowTally::new(columns, headers.len());
    for record in reader.records() {
        match record {
            Ok(record) => tally.add(&record, &mut analysis),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable CSV row");
                tally.skipped += 1;
            }
        }
    }

    analysis.counts = RecordCounts::new(
        tally.patients.len(),
        tally.visits.len(),
        tally.rows,
    );

    match columns.patient_id {
        None => analysis.warn(NO_PATIENT_DATA_WARNING),
        Some(idx) if tally.patients.is_empty() && tally.rows > 0 => analysis.warn(format!(
            "Patient column '{}' has no values - will use single patient mode",
            headers[idx]
        )),
        Some(_) => {}
    }
    if tally.rows == 0 {
        analysis.warn("No data rows found after the header");
    }
    if tally.ragged > 0 {
        analysis.warn(format!(
            "{} rows have a different number of fields than the header",
            tally.ragged
        ));
    }
    if tally.skipped > 0 {
        analysis.warn(format!("{} unreadable rows were skipped", tally.skipped));
    }

    analysis
}

/// Running counts over the data rows.
struct RowTally {
    columns: ColumnMatches,
    width: usize,
    rows: usize,
    ragged: usize,
    skipped: usize,
    patients: HashSet<String>,
    visits: HashSet<(String, String)>,
}

impl RowTally {
    fn new(columns: ColumnMatches, width: usize) -> Self {
        Self {
            columns,
            width,
            rows: 0,
            ragged: 0,
            skipped: 0,
            patients: HashSet::new(),
            visits: HashSet::new(),
        }
    }

    fn add(&mut self, record: &StringRecord, analysis: &mut FormatAnalysis) {
        if record.iter().all(str::is_empty) {
            return;
        }
        self.rows += 1;
        if record.len() != self.width {
            self.ragged += 1;
        }

        let patient = cell(record, self.columns.patient_id);
        if let Some(id) = patient
            && self.patients.insert(id.to_string())
        {
            let name = cell(record, self.columns.patient_name).map(str::to_string);
            analysis.preview(PatientPreview::new(id, name));
        }

        if let Some(visit) = cell(record, self.columns.visit) {
            let owner = patient.unwrap_or_default().to_string();
            self.visits.insert((owner, visit.to_string()));
        }
    }
}

/// Returns the non-empty value at `idx`, if any.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|idx| record.get(idx))
        .filter(|value| !value.is_empty())
}
