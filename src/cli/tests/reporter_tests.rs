use super::driver::{CommandOutput, IndexReport, TypeReport};
use super::reporter::Reporter;
use std::path::PathBuf;

#[test]
fn renders_type_rows_without_color() {
    let output = CommandOutput::Type(TypeReport {
        annotation: "?Foo".to_string(),
        position: "param".to_string(),
        semantic: "?App\\Foo".to_string(),
        shape: "nullable".to_string(),
        doc: Some("?\\App\\Foo".to_string()),
        native: None,
        error: None,
    });
    let text = Reporter::new(false).render(&output);
    assert!(text.contains(" semantic ?App\\Foo\n"));
    assert!(text.contains("   phpdoc ?\\App\\Foo\n"));
    assert!(text.contains("   native (none)\n"));
    assert!(!text.contains("error:"));
}

#[test]
fn renders_not_found_and_index() {
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.render(&CommandOutput::NotFound {
            symbol: "A::run".to_string()
        }),
        "not found: A::run"
    );

    let index = CommandOutput::Index(IndexReport {
        files: 2,
        skipped_files: vec![PathBuf::from("broken.php")],
        classes: 1,
        functions: 0,
        class_names: vec!["App\\User".to_string()],
        function_names: Vec::new(),
    });
    let text = reporter.render(&index);
    assert!(text.starts_with("    files 2\n"));
    assert!(text.contains("skipped: broken.php\n"));
    assert!(text.ends_with("  App\\User\n"));
}
