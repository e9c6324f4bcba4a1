use crate::{FsFileReader, SourceIndexOptions, SourceIndexReflectionProvider, discover_files};
use phz_types::{ClassKind, ReflectionProvider};
use std::fs;
use std::path::Path;

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
        "src/Model/Entity.php",
        r#"<?php
namespace App\Model;

abstract class Entity implements \JsonSerializable
{
    use Timestamps;

    public function id() {}

    public static function create() {}
}
"#,
    );
    write(
        root,
        "src/Model/Timestamps.php",
        r#"<?php
namespace App\Model;

trait Timestamps
{
    public function touch() {}
}
"#,
    );
    write(
        root,
        "src/Model/User.php",
        r#"<?php
namespace App\Model;

final class User extends Entity
{
    public function name() {}
}
"#,
    );
    write(
        root,
        "src/helpers.php",
        r#"<?php
namespace App;

function format_name($name) {}
"#,
    );
    write(root, "src/broken.php", "<?php\nclass {");
    write(root, "src/notes.txt", "not php");
    write(
        root,
        "vendor/lib/Ignored.php",
        "<?php\nclass Ignored {}\n",
    );
    dir
}

fn options(root: &Path) -> SourceIndexOptions {
    SourceIndexOptions {
        roots: vec![root.to_path_buf()],
        exclude: vec![root.join("vendor")],
        ..SourceIndexOptions::default()
    }
}

#[test]
fn discovers_matching_files_outside_excluded_paths() {
    let dir = project();
    let files = discover_files(&options(dir.path()));
    let names: Vec<String> = files
        .iter()
        .map(|path| {
            path.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "src/Model/Entity.php",
            "src/Model/Timestamps.php",
            "src/Model/User.php",
            "src/broken.php",
            "src/helpers.php",
        ]
    );
}

#[test]
fn indexes_classes_and_functions() {
    let dir = project();
    let index = SourceIndexReflectionProvider::build(&options(dir.path()), &FsFileReader);

    assert_eq!(index.class_count(), 3);
    assert_eq!(index.function_count(), 1);
    assert_eq!(index.skipped_files().len(), 1);
    assert!(index.skipped_files()[0].ends_with("broken.php"));

    let user = index.get_class("\\App\\Model\\User").unwrap();
    assert_eq!(user.kind, ClassKind::Class);
    assert_eq!(user.parent.as_deref(), Some("App\\Model\\Entity"));
    assert!(user.file_name.as_ref().unwrap().ends_with("User.php"));
    assert!(!user.builtin);

    let entity = index.get_class("app\\model\\entity").unwrap();
    assert_eq!(entity.interfaces, vec!["JsonSerializable".to_string()]);
    assert_eq!(entity.traits, vec!["App\\Model\\Timestamps".to_string()]);
    assert!(entity.declared_method("create").unwrap().is_static);
    assert!(!entity.declared_method("id").unwrap().is_static);

    let timestamps = index.get_class("App\\Model\\Timestamps").unwrap();
    assert_eq!(timestamps.kind, ClassKind::Trait);

    let function = index.get_function("App\\format_name").unwrap();
    assert!(function.file_name.as_ref().unwrap().ends_with("helpers.php"));
    assert!(index.get_class("Ignored").is_none());
}

#[test]
fn method_lookup_finds_declaring_class() {
    let dir = project();
    let index = SourceIndexReflectionProvider::build(&options(dir.path()), &FsFileReader);

    let own = index.get_method("App\\Model\\User", "name").unwrap();
    assert_eq!(own.declaring_class.name, "App\\Model\\User");

    let inherited = index.get_method("App\\Model\\User", "ID").unwrap();
    assert_eq!(inherited.declaring_class.name, "App\\Model\\Entity");

    let from_trait = index.get_method("App\\Model\\User", "touch").unwrap();
    assert_eq!(from_trait.declaring_class.name, "App\\Model\\Timestamps");

    let native = index.get_method("App\\Model\\User", "jsonSerialize").unwrap();
    assert!(native.declaring_class.builtin);

    assert!(index.get_method("App\\Model\\User", "missing").is_none());
}

#[test]
fn native_symbols_have_no_file() {
    let index = SourceIndexReflectionProvider::from_files(
        &[],
        &["Redis".to_string()],
        &FsFileReader,
    );
    let exception = index.get_class("Exception").unwrap();
    assert!(exception.builtin);
    assert!(exception.file_name.is_none());
    assert_eq!(
        index
            .get_method("RuntimeException", "getMessage")
            .unwrap()
            .declaring_class
            .name,
        "Exception"
    );
    assert!(index.get_class("\\Redis").unwrap().builtin);
    assert!(index.get_function("strlen").unwrap().builtin);
    assert!(index.get_class("Countable").is_some_and(|class| class.kind == ClassKind::Interface));
}
