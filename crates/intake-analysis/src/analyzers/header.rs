//! Heuristic header matching for delimited text.
//!
//! Each column role has an ordered table of patterns. A pattern matches a
//! header cell when the lowercased cell contains every `all_of` fragment and
//! none of the `none_of` fragments. Patterns are tried in table order and the
//! first pattern that matches any header wins.

/// Case-insensitive substring predicate over one header cell.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPattern {
    pub all_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl HeaderPattern {
    const fn new(all_of: &'static [&'static str]) -> Self {
        Self {
            all_of,
            none_of: &[],
        }
    }

    const fn excluding(mut self, none_of: &'static [&'static str]) -> Self {
        self.none_of = none_of;
        self
    }

    /// Returns true if `header` satisfies this pattern.
    pub fn matches(&self, header: &str) -> bool {
        let lowered = header.trim().to_lowercase();
        !self.all_of.is_empty()
            && self.all_of.iter().all(|part| lowered.contains(part))
            && !self.none_of.iter().any(|part| lowered.contains(part))
    }
}

/// Headers that identify a patient.
pub const PATIENT_ID_PATTERNS: &[HeaderPattern] = &[
    HeaderPattern::new(&["patient", "id"]),
    HeaderPattern::new(&["patient", "number"]),
    HeaderPattern::new(&["subject", "id"]),
    HeaderPattern::new(&["usubjid"]),
    HeaderPattern::new(&["subjid"]),
    HeaderPattern::new(&["mrn"]),
    HeaderPattern::new(&["medical", "record"]),
];

/// Headers that carry a patient display name.
pub const PATIENT_NAME_PATTERNS: &[HeaderPattern] = &[
    HeaderPattern::new(&["patient", "name"]),
    HeaderPattern::new(&["full", "name"]),
    HeaderPattern::new(&["subject", "name"]),
    HeaderPattern::new(&["name"]).excluding(&["file", "user"]),
];

/// Headers that group rows into visits.
pub const VISIT_PATTERNS: &[HeaderPattern] = &[
    HeaderPattern::new(&["visit"]),
    HeaderPattern::new(&["encounter"]),
    HeaderPattern::new(&["date"]).excluding(&["birth", "dob", "update"]),
];

/// Finds the first column matching `patterns`, skipping `taken` columns.
pub fn find_column(headers: &[String], patterns: &[HeaderPattern], taken: &[usize]) -> Option<usize> {
    patterns.iter().find_map(|pattern| {
        headers
            .iter()
            .enumerate()
            .find(|(idx, header)| !taken.contains(idx) && pattern.matches(header))
            .map(|(idx, _)| idx)
    })
}

/// Column indices assigned to each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMatches {
    pub patient_id: Option<usize>,
    pub patient_name: Option<usize>,
    pub visit: Option<usize>,
}

impl ColumnMatches {
    /// Assigns roles in priority order: patient id, name, then visit.
    /// A column holds at most one role.
    pub fn detect(headers: &[String]) -> Self {
        let mut taken = Vec::with_capacity(3);

        let patient_id = find_column(headers, PATIENT_ID_PATTERNS, &taken);
        taken.extend(patient_id);
        let patient_name = find_column(headers, PATIENT_NAME_PATTERNS, &taken);
        taken.extend(patient_name);
        let visit = find_column(headers, VISIT_PATTERNS, &taken);

        Self {
            patient_id,
            patient_name,
            visit,
        }
    }
}

/// Normalizes a header cell: trims and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
