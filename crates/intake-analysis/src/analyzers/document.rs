//! Clinical document (composition) analysis.
//!
//! A composition names its patient in `subject` and groups findings as
//! `entry` items under a `section` array. Sections may nest.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AnalysisError, Result};
use crate::result::{FormatAnalysis, PatientPreview};
use crate::sniff::{COMPOSITION_RESOURCE_TYPE, json_text};
use crate::strategy::RecordCounts;

use super::json::lenient_array;

/// Visits contributed by one document.
const VISITS_PER_DOCUMENT: usize = 1;

/// Warning emitted when a document has no subject.
pub const NO_SUBJECT_WARNING: &str =
    "No subject found in clinical document - patient must be selected during import";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Composition {
    #[serde(default)]
    resource_type: Option<Value>,
    #[serde(default)]
    subject: Option<Value>,
    #[serde(default, deserialize_with = "lenient_sections")]
    section: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
struct Section {
    #[serde(default, deserialize_with = "lenient_array")]
    entry: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_sections")]
    section: Vec<Section>,
}

impl Section {
    /// Entries in this section and all nested sections.
    fn entry_count(&self) -> usize {
        self.entry.len() + self.section.iter().map(Section::entry_count).sum::<usize>()
    }
}

/// Keeps the object elements of a `section` array; anything else is empty.
fn lenient_sections<'de, D>(deserializer: D) -> std::result::Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_array(deserializer)?
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Analyzes a clinical document given as JSON text.
pub(crate) fn analyze_clinical_document(content: &str) -> Result<FormatAnalysis> {
    let root: Value = serde_json::from_str(json_text(content))?;
    analyze_composition(root)
}

/// Counts a parsed composition.
pub(crate) fn analyze_composition(root: Value) -> Result<FormatAnalysis> {
    if !root.is_object() {
        return Err(AnalysisError::InvalidDocument {
            reason: "clinical document root must be a JSON object".to_string(),
        });
    }

    let composition: Composition = serde_json::from_value(root)?;
    let mut analysis = FormatAnalysis::default();

    match composition.resource_type.as_ref().and_then(Value::as_str) {
        Some(COMPOSITION_RESOURCE_TYPE) | None => {}
        Some(other) => analysis.warn(format!(
            "Unexpected resourceType '{other}' - expected {COMPOSITION_RESOURCE_TYPE}"
        )),
    }

    let patients_count = match &composition.subject {
        Some(subject) => {
            if let Some(preview) = subject_preview(subject) {
                analysis.preview(preview);
            }
            1
        }
        None => {
            analysis.warn(NO_SUBJECT_WARNING);
            0
        }
    };

    if composition.section.is_empty() {
        analysis.warn("No sections found in clinical document");
    }
    let observations_count = composition.section.iter().map(Section::entry_count).sum();

    analysis.counts = RecordCounts::new(patients_count, VISITS_PER_DOCUMENT, observations_count);
    Ok(analysis)
}

/// Builds a preview from a subject reference such as
/// `{"reference": "Patient/123", "display": "Jane Doe"}`.
fn subject_preview(subject: &Value) -> Option<PatientPreview> {
    let id = non_empty(subject.get("reference"))
        .map(|reference| reference.rsplit('/').next().unwrap_or(reference))
        .or_else(|| non_empty(subject.get("identifier").and_then(|ident| ident.get("value"))))
        .or_else(|| non_empty(subject.get("id")))?;
    let name = non_empty(subject.get("display")).map(str::to_string);

    Some(PatientPreview::new(id, name))
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
