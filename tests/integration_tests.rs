//! End-to-end tests of the command layer against on-disk projects.

use phz::cli::args::{Command, Position};
use phz::cli::config::load_project_config;
use phz::cli::driver::{CommandOutput, execute};
use phz_common::PhpVersion;
use std::fs;
use std::path::Path;
use std::process::Command as Process;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "phz.json",
        r#"{ "phpVersion": "7.4", "paths": ["src"], "excludePaths": ["src/Legacy"] }"#,
    );
    write(
        root,
        "src/Model.php",
        r#"<?php
namespace App;

abstract class Model
{
    public function save(): bool
    {
        return true;
    }
}
"#,
    );
    write(
        root,
        "src/User.php",
        r#"<?php
namespace App;

class User extends Model
{
    public function name(): string
    {
        return 'user';
    }
}
"#,
    );
    write(
        root,
        "src/helpers.php",
        "<?php\nnamespace App;\n\nfunction slug($text) { return $text; }\n",
    );
    write(root, "src/Legacy/Old.php", "<?php\nclass Old {}\n");
    dir
}

#[test]
fn resolves_inherited_method_in_project() {
    let dir = project();
    let config = load_project_config(dir.path(), None, None).unwrap();
    assert_eq!(config.php_version, PhpVersion::PHP_74);

    let output = execute(
        &config,
        &Command::Method {
            class: "\\App\\User".to_string(),
            method: "save".to_string(),
        },
    )
    .unwrap();
    let CommandOutput::Declaration(report) = output else {
        panic!("expected a declaration, got {output:?}");
    };
    assert_eq!(report.symbol, "App\\User::save");
    assert!(report.path.ends_with("Model.php"));
    assert_eq!(report.class_name.as_deref(), Some("App\\Model"));
    assert!(report.text.starts_with("public function save(): bool"));
    assert_eq!(report.stats.files_read, 1);
}

#[test]
fn resolves_classes_and_functions() {
    let dir = project();
    let config = load_project_config(dir.path(), None, None).unwrap();

    let class = execute(&config, &Command::Class { name: "App\\User".to_string() }).unwrap();
    assert!(matches!(&class, CommandOutput::Declaration(report) if report.path.ends_with("User.php")));

    let function = execute(&config, &Command::Function { name: "App\\slug".to_string() }).unwrap();
    assert!(matches!(
        &function,
        CommandOutput::Declaration(report) if report.text == "function slug($text) { return $text; }"
    ));

    let excluded = execute(&config, &Command::Class { name: "Old".to_string() }).unwrap();
    assert_eq!(excluded, CommandOutput::NotFound { symbol: "Old".to_string() });
    assert!(!excluded.is_success());
}

#[test]
fn index_lists_project_symbols() {
    let dir = project();
    let config = load_project_config(dir.path(), None, None).unwrap();
    let CommandOutput::Index(report) = execute(&config, &Command::Index { list: true }).unwrap() else {
        panic!("expected an index report");
    };
    assert_eq!(report.files, 3);
    assert_eq!(report.classes, 2);
    assert_eq!(report.functions, 1);
    assert!(report.class_names.contains(&"App\\User".to_string()));
    assert_eq!(report.function_names, vec!["App\\slug".to_string()]);
}

#[test]
fn maps_annotations_for_the_configured_version() {
    let dir = project();
    let config = load_project_config(dir.path(), None, None).unwrap();

    let CommandOutput::Type(union) = execute(
        &config,
        &Command::Type {
            annotation: "int|string".to_string(),
            kind: Position::Param,
            namespace: None,
        },
    )
    .unwrap() else {
        panic!("expected a type report");
    };
    assert_eq!(union.doc.as_deref(), Some("int|string"));
    assert_eq!(union.native, None);
    assert_eq!(union.error, None);

    let config = load_project_config(dir.path(), None, Some(PhpVersion::PHP_80)).unwrap();
    let CommandOutput::Type(nullable) = execute(
        &config,
        &Command::Type {
            annotation: "?User".to_string(),
            kind: Position::Return,
            namespace: Some("App".to_string()),
        },
    )
    .unwrap() else {
        panic!("expected a type report");
    };
    assert_eq!(nullable.semantic, "?App\\User");
    assert_eq!(nullable.doc.as_deref(), Some("?\\App\\User"));
    assert_eq!(nullable.native.as_deref(), Some("?\\App\\User"));

    let invalid = execute(
        &config,
        &Command::Type {
            annotation: "int string".to_string(),
            kind: Position::Any,
            namespace: None,
        },
    );
    assert!(invalid.is_err());
}

#[test]
fn binary_prints_json() {
    let dir = project();
    let output = Process::new(env!("CARGO_BIN_EXE_phz"))
        .current_dir(dir.path())
        .args(["--json", "class", "App\\Model"])
        .env_remove("PHZ_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "declaration");
    assert_eq!(value["symbol"], "App\\Model");
    assert_eq!(value["className"], "App\\Model");

    let missing = Process::new(env!("CARGO_BIN_EXE_phz"))
        .current_dir(dir.path())
        .args(["--no-color", "method", "App\\User", "missing"])
        .env_remove("PHZ_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stdout).contains("not found: App\\User::missing"));
}
