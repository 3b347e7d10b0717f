//! File format tags and detection.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sniff::{is_csv_content, is_hl7_content, is_html_content, is_json_content};

/// Serialization format of an analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Delimited text (comma or semicolon).
    Csv,
    /// Generic JSON export with patient/visit/observation arrays.
    Json,
    /// FHIR-flavored clinical document (composition).
    Hl7,
    /// HTML page embedding survey JSON in a script block.
    Html,
    /// Format could not be determined.
    #[default]
    Unknown,
}

/// Formats the engine can analyze, in sniffing priority order.
pub const SUPPORTED_FORMATS: [FileFormat; 4] = [
    FileFormat::Csv,
    FileFormat::Json,
    FileFormat::Hl7,
    FileFormat::Html,
];

impl FileFormat {
    /// Returns the lowercase tag used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Hl7 => "hl7",
            Self::Html => "html",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a file extension (without the dot) to a format.
    ///
    /// Matching is case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "hl7" => Some(Self::Hl7),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// File extensions (without the dot) that map to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Csv => &["csv"],
            Self::Json => &["json"],
            Self::Hl7 => &["hl7"],
            Self::Html => &["html", "htm"],
            Self::Unknown => &[],
        }
    }

    /// Returns true if content of this format passes its sniffer.
    fn sniff(self, content: &str) -> bool {
        match self {
            Self::Csv => is_csv_content(content),
            Self::Json => is_json_content(content),
            Self::Hl7 => is_hl7_content(content),
            Self::Html => is_html_content(content),
            Self::Unknown => false,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects the format of `content`, named `filename`.
///
/// The extension wins when it maps to a supported format. Otherwise the
/// sniffers run in [`SUPPORTED_FORMATS`] order and the first match wins.
/// Returns `None` when nothing matches.
pub fn detect_format(content: &str, filename: &str) -> Option<FileFormat> {
    let by_extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileFormat::from_extension);

    if let Some(format) = by_extension {
        tracing::debug!(%format, "format detected from extension");
        return Some(format);
    }

    let sniffed = SUPPORTED_FORMATS
        .into_iter()
        .find(|format| format.sniff(content));

    match sniffed {
        Some(format) => tracing::debug!(%format, "format detected from content"),
        None => tracing::debug!("no format matched"),
    }
    sniffed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_round_trip_through_from_extension() {
        for format in SUPPORTED_FORMATS {
            assert!(!format.extensions().is_empty());
            for ext in format.extensions() {
                assert_eq!(FileFormat::from_extension(ext), Some(format));
            }
        }
        assert!(FileFormat::Unknown.extensions().is_empty());
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(detect_format("", "a.csv"), Some(FileFormat::Csv));
        assert_eq!(detect_format("", "a.json"), Some(FileFormat::Json));
        assert_eq!(detect_format("", "a.hl7"), Some(FileFormat::Hl7));
        assert_eq!(detect_format("", "a.html"), Some(FileFormat::Html));
        assert_eq!(detect_format("", "a.htm"), Some(FileFormat::Html));
        assert_eq!(detect_format("", "EXPORT.CSV"), Some(FileFormat::Csv));
    }

    #[test]
    fn test_extension_beats_content() {
        assert_eq!(detect_format("{\"a\": 1}", "data.csv"), Some(FileFormat::Csv));
        assert_eq!(detect_format("a,b,c", "data.json"), Some(FileFormat::Json));
    }

    #[test]
    fn test_sniff_without_extension() {
        assert_eq!(detect_format("a,b,c\n1,2,3", "upload"), Some(FileFormat::Csv));
        assert_eq!(detect_format("{\"a\": 1}", "upload"), Some(FileFormat::Json));
        assert_eq!(
            detect_format("<ClinicalDocument>\n</ClinicalDocument>", "upload.xml"),
            Some(FileFormat::Hl7)
        );
        assert_eq!(
            detect_format("<!DOCTYPE html>\n<html></html>", "upload.txt"),
            Some(FileFormat::Html)
        );
        assert_eq!(detect_format("plain text content", "test.unknown"), None);
    }

    #[test]
    fn test_sniff_priority() {
        // A composition is valid JSON, so JSON wins.
        let composition = "{\"resourceType\": \"Composition\"}";
        assert_eq!(detect_format(composition, "doc"), Some(FileFormat::Json));

        // A first line with fields wins over everything else.
        let html = "<td>a</td>,<td>b</td>\n<script></script>";
        assert_eq!(detect_format(html, "page"), Some(FileFormat::Csv));
    }

    #[test]
    fn test_display() {
        assert_eq!(FileFormat::Hl7.to_string(), "hl7");
        assert_eq!(FileFormat::Unknown.to_string(), "unknown");
    }
}
