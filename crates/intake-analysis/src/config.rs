//! Configuration for the import analyzer.

use serde::{Deserialize, Serialize};

use crate::format::{FileFormat, SUPPORTED_FORMATS};

/// Default maximum file size, as written in configuration.
pub const DEFAULT_MAX_FILE_SIZE: &str = "50MB";

/// Default maximum file size in bytes (50 MB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Default validation level.
pub const DEFAULT_VALIDATION_LEVEL: &str = "standard";

/// Size units accepted by [`parse_file_size`], 1024-based.
const SIZE_UNITS: [(&str, u64); 3] = [
    ("KB", 1024),
    ("MB", 1024 * 1024),
    ("GB", 1024 * 1024 * 1024),
];

/// Analyzer configuration owned by one [`ImportAnalyzer`](crate::ImportAnalyzer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Maximum accepted content size, e.g. `"50MB"`.
    pub max_file_size: String,
    /// Validation level passed through to downstream importers.
    pub validation_level: String,
    /// Formats this analyzer handles. Fixed to [`SUPPORTED_FORMATS`].
    #[serde(skip_deserializing, default = "supported_formats")]
    supported_formats: Vec<FileFormat>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE.to_string(),
            validation_level: DEFAULT_VALIDATION_LEVEL.to_string(),
            supported_formats: supported_formats(),
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: impl Into<String>) -> Self {
        self.max_file_size = max_file_size.into();
        self
    }

    #[must_use]
    pub fn with_validation_level(mut self, validation_level: impl Into<String>) -> Self {
        self.validation_level = validation_level.into();
        self
    }

    /// Returns the supported formats in sniffing priority order.
    pub fn supported_formats(&self) -> &[FileFormat] {
        &self.supported_formats
    }

    /// Returns the configured maximum size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        parse_file_size(&self.max_file_size)
    }

    /// Merges a partial update into this configuration.
    ///
    /// Only the fields present in `update` change.
    pub fn merge(&mut self, update: ConfigUpdate) {
        if let Some(max_file_size) = update.max_file_size {
            self.max_file_size = max_file_size;
        }
        if let Some(validation_level) = update.validation_level {
            self.validation_level = validation_level;
        }
    }
}

/// Partial configuration update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_level: Option<String>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: impl Into<String>) -> Self {
        self.max_file_size = Some(max_file_size.into());
        self
    }

    #[must_use]
    pub fn with_validation_level(mut self, validation_level: impl Into<String>) -> Self {
        self.validation_level = Some(validation_level.into());
        self
    }

    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.max_file_size.is_none() && self.validation_level.is_none()
    }
}

fn supported_formats() -> Vec<FileFormat> {
    SUPPORTED_FORMATS.to_vec()
}

/// Parses a size such as `"50MB"` into bytes.
///
/// Accepts `<number><unit>` with unit `KB`, `MB` or `GB` (case-sensitive,
/// 1024-based). Anything else yields [`DEFAULT_MAX_FILE_SIZE_BYTES`].
pub fn parse_file_size(spec: &str) -> u64 {
    let trimmed = spec.trim();

    SIZE_UNITS
        .iter()
        .find_map(|&(unit, multiplier)| {
            let number = trimmed.strip_suffix(unit)?.trim_end();
            let value: f64 = number.parse().ok()?;
            (value.is_finite() && value >= 0.0).then(|| (value * multiplier as f64) as u64)
        })
        .unwrap_or_else(|| {
            tracing::debug!(spec, "unparseable file size, using default");
            DEFAULT_MAX_FILE_SIZE_BYTES
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_size_units() {
        assert_eq!(parse_file_size("1KB"), 1024);
        assert_eq!(parse_file_size("1MB"), 1_048_576);
        assert_eq!(parse_file_size("50MB"), 52_428_800);
        assert_eq!(parse_file_size("2GB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_file_size("1.5MB"), 1_572_864);
        assert_eq!(parse_file_size(" 10 KB "), 10_240);
    }

    #[test]
    fn test_parse_file_size_falls_back_to_default() {
        assert_eq!(parse_file_size("not-a-size"), DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parse_file_size("10mb"), DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parse_file_size("1024"), DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parse_file_size("MB"), DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parse_file_size("-5MB"), DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parse_file_size(""), DEFAULT_MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_file_size, "50MB");
        assert_eq!(config.validation_level, "standard");
        assert_eq!(config.supported_formats(), &SUPPORTED_FORMATS);
        assert_eq!(config.max_file_size_bytes(), 52_428_800);
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut config = AnalyzerConfig::new().with_validation_level("strict");
        config.merge(ConfigUpdate::new().with_max_file_size("1MB"));

        assert_eq!(config.max_file_size, "1MB");
        assert_eq!(config.validation_level, "strict");

        config.merge(ConfigUpdate::default());
        assert_eq!(config.max_file_size, "1MB");
    }

    #[test]
    fn test_config_update_from_json() {
        let update: ConfigUpdate = serde_json::from_str(r#"{"maxFileSize": "10MB"}"#).unwrap();
        assert_eq!(update.max_file_size.as_deref(), Some("10MB"));
        assert!(update.validation_level.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_config_ignores_supported_formats_on_load() {
        let config: AnalyzerConfig = serde_json::from_str(
            r#"{"maxFileSize": "5MB", "validationLevel": "lenient", "supportedFormats": ["csv"]}"#,
        )
        .unwrap();
        assert_eq!(config.supported_formats(), &SUPPORTED_FORMATS);
    }
}
