//! Property tests over the public analysis surface.

use intake_analysis::{FileFormat, ImportAnalyzer, detect_format};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_analysis_is_idempotent(content in ".{0,200}", name in "[a-z]{1,8}\\.(csv|json|hl7|html|txt)") {
        let analyzer = ImportAnalyzer::default();
        let first = analyzer.analyze_file_content(&content, &name);
        let second = analyzer.analyze_file_content(&content, &name);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_csv_never_fails(content in "[a-zA-Z0-9 ,;\"\n]{1,300}") {
        let result = ImportAnalyzer::default().analyze_file_content(&content, "upload.csv");
        prop_assert!(result.success());
        prop_assert!(result.errors().is_empty());
    }

    #[test]
    fn prop_success_matches_errors(content in ".{0,200}", name in "[a-z]{1,8}(\\.[a-z]{2,4})?") {
        let result = ImportAnalyzer::default().analyze_file_content(&content, &name);
        prop_assert_eq!(result.success(), result.errors().is_empty());
    }

    #[test]
    fn prop_extension_wins(content in ".{0,100}") {
        prop_assert_eq!(detect_format(&content, "a.csv"), Some(FileFormat::Csv));
        prop_assert_eq!(detect_format(&content, "a.json"), Some(FileFormat::Json));
        prop_assert_eq!(detect_format(&content, "a.hl7"), Some(FileFormat::Hl7));
        prop_assert_eq!(detect_format(&content, "a.htm"), Some(FileFormat::Html));
    }
}

#[test]
fn csv_sniff_beats_later_formats() {
    let both = "<html>,<body>\n<script></script>";
    assert_eq!(detect_format(both, "upload"), Some(FileFormat::Csv));
}
