//! Content sniffers.
//!
//! Pure predicates that classify text by inspecting it rather than trusting
//! the filename. They share no state and never fail.

use serde_json::Value;

/// Delimiter candidates, in tie-break order.
pub(crate) const DELIMITER_CANDIDATES: [char; 2] = [',', ';'];

/// Resource type of a clinical-document composition.
pub(crate) const COMPOSITION_RESOURCE_TYPE: &str = "Composition";

/// Root element names of XML-like clinical documents.
const CLINICAL_DOCUMENT_TAGS: &[&str] = &["<ClinicalDocument"];

/// Markers of an HTML page, matched case-insensitively.
const HTML_MARKERS: &[&str] = &["<!doctype html", "<html", "<script"];

/// Returns true if the first line splits into at least two non-empty fields
/// on one of the delimiter candidates.
pub fn is_csv_content(content: &str) -> bool {
    let Some(first_line) = strip_bom(content).lines().next() else {
        return false;
    };

    DELIMITER_CANDIDATES.iter().any(|&delimiter| {
        first_line.contains(delimiter)
            && first_line
                .split(delimiter)
                .filter(|field| !field.trim().is_empty())
                .count()
                >= 2
    })
}

/// Returns true if the whole trimmed content is a JSON object or array.
pub fn is_json_content(content: &str) -> bool {
    parse_json_container(content).is_some()
}

/// Returns true if the content is a composition resource, or carries a
/// clinical-document root tag.
pub fn is_hl7_content(content: &str) -> bool {
    let is_composition = parse_json_container(content)
        .and_then(|value| {
            value
                .get("resourceType")
                .and_then(Value::as_str)
                .map(|resource_type| resource_type == COMPOSITION_RESOURCE_TYPE)
        })
        .unwrap_or(false);

    is_composition || CLINICAL_DOCUMENT_TAGS.iter().any(|tag| content.contains(tag))
}

/// Returns true if the content has an HTML document wrapper or a script block.
pub fn is_html_content(content: &str) -> bool {
    let lowered = content.to_ascii_lowercase();
    HTML_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Strips a leading UTF-8 byte order mark.
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Strips a leading byte order mark and surrounding whitespace from JSON text.
pub(crate) fn json_text(content: &str) -> &str {
    strip_bom(content).trim()
}

fn parse_json_container(content: &str) -> Option<Value> {
    let trimmed = json_text(content);
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .filter(|value| value.is_object() || value.is_array())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv_content() {
        assert!(is_csv_content("a,b,c\n1,2,3"));
        assert!(is_csv_content("a;b;c"));
        assert!(is_csv_content("\u{feff}Patient ID,Age"));
        assert!(!is_csv_content("plain text content"));
        assert!(!is_csv_content("just one,"));
        assert!(!is_csv_content(""));
    }

    #[test]
    fn test_is_csv_content_only_checks_first_line() {
        assert!(!is_csv_content("title line\na,b,c"));
    }

    #[test]
    fn test_is_json_content() {
        assert!(is_json_content("{\"patients\": []}"));
        assert!(is_json_content("  [1, 2, 3]  "));
        assert!(!is_json_content("{\"patients\": ["));
        assert!(!is_json_content("\"just a string\""));
        assert!(!is_json_content("42"));
    }

    #[test]
    fn test_json_sniffers_ignore_bom() {
        assert!(is_json_content("\u{feff}{\"patients\": [{}, {}]}"));
        assert!(is_hl7_content("\u{feff}\n{\"resourceType\": \"Composition\"}"));
        assert_eq!(json_text("\u{feff}  [1]\n"), "[1]");
    }

    #[test]
    fn test_is_hl7_content() {
        assert!(is_hl7_content("{\"resourceType\": \"Composition\"}"));
        assert!(is_hl7_content(
            "<?xml version=\"1.0\"?>\n<ClinicalDocument xmlns=\"urn:hl7-org:v3\">"
        ));
        assert!(!is_hl7_content("{\"resourceType\": \"Patient\"}"));
        assert!(!is_hl7_content("{\"patients\": []}"));
    }

    #[test]
    fn test_is_html_content() {
        assert!(is_html_content("<!DOCTYPE html><html></html>"));
        assert!(is_html_content("<HTML><body></body></HTML>"));
        assert!(is_html_content("<script>var surveyData = {};</script>"));
        assert!(!is_html_content("{\"a\": \"b\"}"));
    }
}
