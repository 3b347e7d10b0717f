//! Generic JSON export analysis.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;
use crate::result::{FormatAnalysis, PatientPreview};
use crate::sniff::json_text;
use crate::strategy::RecordCounts;

/// Top-level shape of a JSON export.
///
/// Every field is optional. A field that is absent or not an array
/// counts as empty.
#[derive(Debug, Default, Deserialize)]
struct JsonExport {
    #[serde(default, deserialize_with = "lenient_array")]
    patients: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_array")]
    visits: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_array")]
    observations: Vec<Value>,
}

/// Accepts any JSON value, keeping it only when it is an array.
pub(crate) fn lenient_array<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Analyzes a JSON export with `patients`, `visits` and `observations` arrays.
pub(crate) fn analyze_json(content: &str) -> Result<FormatAnalysis> {
    let root: Value = serde_json::from_str(json_text(content))?;
    let mut analysis = FormatAnalysis::default();

    if !root.is_object() {
        analysis.warn("JSON root is not an object - no patients, visits, or observations found");
        return Ok(analysis);
    }

    let export: JsonExport = serde_json::from_value(root)?;
    analysis.counts = RecordCounts::new(
        export.patients.len(),
        export.visits.len(),
        export.observations.len(),
    );

    for patient in &export.patients {
        if let Some(preview) = preview_from_value(patient) {
            analysis.preview(preview);
        }
    }

    if analysis.counts.total() == 0 {
        analysis.warn("No patients, visits, or observations arrays found");
    }

    Ok(analysis)
}

/// Reads `id` and `name` from a patient element, when it has an id.
fn preview_from_value(patient: &Value) -> Option<PatientPreview> {
    let id = match patient.get("id")? {
        Value::String(id) if !id.trim().is_empty() => id.trim().to_string(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    let name = patient
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Some(PatientPreview::new(id, name))
}
