//! HTML survey analysis.
//!
//! Survey pages embed their clinical document as an object literal assigned
//! to a known variable inside a `<script>` block. The object is located by
//! plain text scanning and brace matching; the page is never parsed as HTML
//! or JavaScript.

use serde_json::Value;

use crate::error::Result;
use crate::result::FormatAnalysis;

use super::document::analyze_composition;

/// Variable names that hold an embedded clinical document.
pub const SURVEY_VARIABLES: &[&str] = &[
    "surveyData",
    "surveyResponse",
    "questionnaireResponse",
    "clinicalDocument",
    "fhirComposition",
    "composition",
];

/// Warning emitted when a page carries no survey payload.
pub const NO_SURVEY_DATA_WARNING: &str = "No embedded survey data found in HTML file";

/// Analyzes an HTML page with an embedded survey document.
pub(crate) fn analyze_html_survey(content: &str) -> Result<FormatAnalysis> {
    let Some(literal) = find_embedded_document(content) else {
        let mut analysis = FormatAnalysis::default();
        analysis.warn(NO_SURVEY_DATA_WARNING);
        return Ok(analysis);
    };

    tracing::debug!(bytes = literal.len(), "embedded survey object extracted");
    let root: Value = serde_json::from_str(literal)?;
    analyze_composition(root)
}

/// Returns the first object literal assigned to a survey variable.
pub fn find_embedded_document(content: &str) -> Option<&str> {
    script_blocks(content).find_map(|script| {
        SURVEY_VARIABLES
            .iter()
            .find_map(|name| find_assigned_object(script, name))
    })
}

/// Iterates over the bodies of `<script>` blocks.
///
/// An unterminated block runs to the end of the content.
fn script_blocks(content: &str) -> impl Iterator<Item = &str> {
    // ASCII lowercasing keeps byte offsets aligned with `content`.
    let lowered = content.to_ascii_lowercase();
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(open) = lowered[cursor..].find("<script") {
        let tag_start = cursor + open;
        let Some(tag_close) = lowered[tag_start..].find('>') else {
            break;
        };
        let body_start = tag_start + tag_close + 1;
        let body_end = lowered[body_start..]
            .find("</script")
            .map_or(content.len(), |offset| body_start + offset);
        blocks.push(&content[body_start..body_end]);
        cursor = body_end;
    }

    blocks.into_iter()
}

/// Finds `name = {...}` in `script` and returns the balanced object literal.
fn find_assigned_object<'a>(script: &'a str, name: &str) -> Option<&'a str> {
    script.match_indices(name).find_map(|(start, _)| {
        let preceded_by_ident = script[..start]
            .chars()
            .next_back()
            .is_some_and(is_ident_char);
        if preceded_by_ident {
            return None;
        }

        let rest = script[start + name.len()..].trim_start();
        let rest = rest.strip_prefix('=')?;
        if rest.starts_with('=') {
            return None;
        }
        let rest = rest.trim_start();
        rest.starts_with('{').then(|| balanced_object(rest)).flatten()
    })
}

/// Returns the prefix of `text` up to the brace closing its first `{`.
///
/// Braces inside string literals are ignored. Returns `None` when the
/// object never closes.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if let Some(open_quote) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open_quote {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_JSON;
    use crate::strategy::RecordCounts;

    fn page(script: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>Intake</title></head>\n<body>\n\
             <script type=\"text/javascript\">\n{script}\n</script>\n</body></html>"
        )
    }

    #[test]
    fn test_extracts_survey_document() {
        let html = page(
            r#"const surveyData = {"subject": {"reference": "Patient/9"}, "section": [{"entry": [{}, {}]}]};
               render(surveyData);"#,
        );
        let analysis = analyze_html_survey(&html).unwrap();
        assert_eq!(analysis.counts, RecordCounts::new(1, 1, 2));
        assert_eq!(analysis.patients[0].id, "9");
    }

    #[test]
    fn test_braces_inside_strings() {
        let html = page(r#"window.composition = {"subject": {}, "note": "a } and { b", "section": []};"#);
        let literal = find_embedded_document(&html).unwrap();
        assert!(literal.ends_with("\"section\": []}"));
    }

    #[test]
    fn test_ignores_comparisons_and_longer_names() {
        let script = "if (surveyData == {}) {}\nvar surveyDataUrl = {\"x\": 1};";
        assert_eq!(find_assigned_object(script, "surveyData"), None);
    }

    #[test]
    fn test_no_payload_is_a_warning() {
        let analysis = analyze_html_survey(&page("console.log('hello');")).unwrap();
        assert_eq!(analysis.counts, RecordCounts::default());
        assert_eq!(analysis.warnings, vec![NO_SURVEY_DATA_WARNING]);

        let analysis = analyze_html_survey("<html><body>No scripts</body></html>").unwrap();
        assert_eq!(analysis.warnings, vec![NO_SURVEY_DATA_WARNING]);
    }

    #[test]
    fn test_unbalanced_object_is_not_found() {
        let html = "<script>var surveyData = {\"subject\": {}";
        assert_eq!(find_embedded_document(html), None);
    }

    #[test]
    fn test_malformed_payload_is_invalid_json() {
        let html = page("var surveyData = {subject: {}, section: []};");
        let err = analyze_html_survey(&html).unwrap_err();
        assert_eq!(err.code(), INVALID_JSON);
    }

    #[test]
    fn test_balanced_object() {
        assert_eq!(balanced_object("{\"a\": {\"b\": 1}} trailing"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(balanced_object("{\"a\": \"\\\"}\"}"), Some("{\"a\": \"\\\"}\"}"));
        assert_eq!(balanced_object("{"), None);
    }
}
