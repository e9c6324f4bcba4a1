use phz_parser::{
    NodeArena, NodeIndex, NodeLocator, ScopeDecorator, SourceParser, SourceUnit, SyntaxStore,
};
use phz_resolver::{
    AstResolver, FileReader, FsFileReader, MissReason, NodeTypeResolver, ResolutionCache,
    SourceIndexOptions, SourceIndexReflectionProvider, SymbolKey,
};
use phz_scanner::SyntaxKind;
use phz_types::{
    ClassKind, ClassReflection, FunctionReflection, InMemoryReflectionProvider, ReflectionProvider,
    SemanticType,
};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory files with a read counter.
#[derive(Default)]
struct MemoryFiles {
    files: HashMap<PathBuf, String>,
    reads: AtomicUsize,
}

impl MemoryFiles {
    fn with(mut self, path: &str, text: &str) -> MemoryFiles {
        self.files.insert(PathBuf::from(path), text.to_string());
        self
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FileReader for MemoryFiles {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

fn resolver(
    provider: InMemoryReflectionProvider,
    files: MemoryFiles,
) -> (AstResolver, Arc<MemoryFiles>) {
    let files = Arc::new(files);
    let resolver = AstResolver::new(Arc::new(provider), Arc::clone(&files) as Arc<dyn FileReader>);
    (resolver, files)
}

fn class(name: &str, file: &str) -> ClassReflection {
    ClassReflection::new(name, ClassKind::Class).with_file(file)
}

const A_PHP: &str = r#"<?php
class A
{
    public function run()
    {
        return 1;
    }

    public static function make()
    {
        return new A();
    }
}
"#;

#[test]
fn method_resolves_once_then_hits_cache() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("A", "a.php").with_method("run", false).with_method("make", true));
    let (mut resolver, files) = resolver(provider, MemoryFiles::default().with("a.php", A_PHP));

    let first = resolver.resolve_class_method("A", "run").unwrap();
    assert_eq!(first.kind, SyntaxKind::MethodDeclaration);
    assert_eq!(first.name, "run");
    assert_eq!(first.path, PathBuf::from("a.php"));
    assert!(first.text.starts_with("public function run()"));
    assert!(first.text.contains("return 1;"));
    assert_eq!(first.class_name(), Some("A"));

    let second = resolver.resolve_class_method("\\a", "RUN").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(files.reads(), 1);

    let stats = resolver.stats();
    assert_eq!(stats.files_read, 1);
    assert_eq!(stats.files_parsed, 1);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.negative_hits, 0);
}

#[test]
fn missing_function_is_remembered() {
    let mut provider = InMemoryReflectionProvider::new();
    let function = provider.add_function(FunctionReflection::new(
        "helper",
        Some(PathBuf::from("helpers.php")),
    ));
    let (mut resolver, files) = resolver(
        provider,
        MemoryFiles::default().with("helpers.php", "<?php\nfunction other() {}\n"),
    );

    assert!(resolver.resolve_function_from_reflection(&function).is_none());
    assert!(resolver.resolve_function_from_reflection(&function).is_none());
    assert_eq!(files.reads(), 1);
    assert_eq!(resolver.stats().negative_hits, 1);

    let key = SymbolKey::new("helper", Some(Path::new("helpers.php")));
    assert_eq!(
        resolver.cache().function(&key).and_then(|entry| entry.miss_reason()),
        Some(MissReason::DeclarationNotFound)
    );
}

#[test]
fn function_found_among_several_declarations() {
    let source = r#"<?php
namespace Util;

function a() {}
function b() { return 'b'; }
function c() {}
"#;
    let mut provider = InMemoryReflectionProvider::new();
    let b = provider.add_function(FunctionReflection::new(
        "Util\\b",
        Some(PathBuf::from("util.php")),
    ));
    let (mut resolver, _) = resolver(provider, MemoryFiles::default().with("util.php", source));

    let node = resolver.resolve_function_from_reflection(&b).unwrap();
    assert_eq!(node.kind, SyntaxKind::FunctionDeclaration);
    assert_eq!(node.name, "b");
    assert_eq!(node.text, "function b() { return 'b'; }");
}

#[test]
fn native_function_has_no_declaration() {
    let mut provider = InMemoryReflectionProvider::new();
    let strlen = provider.add_function(FunctionReflection::new("strlen", None));
    let (mut resolver, files) = resolver(provider, MemoryFiles::default());

    assert!(resolver.resolve_function_from_reflection(&strlen).is_none());
    assert_eq!(files.reads(), 0);
    let key = SymbolKey::new("strlen", None);
    assert_eq!(
        resolver.cache().function(&key).and_then(|entry| entry.miss_reason()),
        Some(MissReason::NativeSymbol)
    );
}

#[test]
fn same_class_name_in_different_files_is_not_shared() {
    let one = class("Foo", "one.php");
    let two = class("Foo", "two.php");
    let (mut resolver, _) = resolver(
        InMemoryReflectionProvider::new(),
        MemoryFiles::default()
            .with("one.php", "<?php\nclass Foo { public function one() {} }\n")
            .with("two.php", "<?php\nclass Foo { public function two() {} }\n"),
    );

    let from_one = resolver.resolve_class_from_reflection(&one, "Foo").unwrap();
    let from_two = resolver.resolve_class_from_reflection(&two, "\\Foo").unwrap();
    assert_eq!(from_one.path, PathBuf::from("one.php"));
    assert_eq!(from_two.path, PathBuf::from("two.php"));
    assert!(!Arc::ptr_eq(&from_one, &from_two));
    assert!(resolver.resolve_class_from_reflection(&one, "Bar").is_none());
    assert_eq!(resolver.cache().len(), 2);
}

#[test]
fn native_class_is_absent_and_uncached() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(ClassReflection::builtin("Exception").with_method("getMessage", false));
    provider.add_class(class("App\\Failure", "failure.php").with_parent("Exception"));
    let (mut resolver, files) = resolver(
        provider,
        MemoryFiles::default().with("failure.php", "<?php\nnamespace App;\nclass Failure extends \\Exception {}\n"),
    );

    assert!(resolver.resolve_class_from_name("Exception").is_none());
    assert!(resolver.cache().is_empty());

    assert!(resolver.resolve_class_method("App\\Failure", "getMessage").is_none());
    let key = ResolutionCache::method_key(SymbolKey::new("Exception", None), "getMessage");
    assert_eq!(
        resolver.cache().method(&key).and_then(|entry| entry.miss_reason()),
        Some(MissReason::NativeSymbol)
    );
    assert_eq!(files.reads(), 0);
}

#[test]
fn unreadable_and_unparseable_files_are_negative() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("Gone", "gone.php").with_method("run", false));
    provider.add_class(class("Broken", "broken.php").with_method("run", false));
    let (mut resolver, files) = resolver(
        provider,
        MemoryFiles::default().with("broken.php", "<?php\nclass Broken {\n"),
    );

    assert!(resolver.resolve_class_method("Gone", "run").is_none());
    assert!(resolver.resolve_class_method("Broken", "run").is_none());
    assert!(resolver.resolve_class_method("Gone", "run").is_none());
    assert!(resolver.resolve_class_method("Broken", "run").is_none());
    assert_eq!(files.reads(), 2);

    let gone = ResolutionCache::method_key(SymbolKey::new("Gone", Some(Path::new("gone.php"))), "run");
    let broken =
        ResolutionCache::method_key(SymbolKey::new("Broken", Some(Path::new("broken.php"))), "run");
    assert_eq!(
        resolver.cache().method(&gone).and_then(|entry| entry.miss_reason()),
        Some(MissReason::UnreadableFile)
    );
    assert_eq!(
        resolver.cache().method(&broken).and_then(|entry| entry.miss_reason()),
        Some(MissReason::UnparseableFile)
    );
    let stats = resolver.stats();
    assert_eq!(stats.files_parsed, 1);
    assert_eq!(stats.negative_hits, 2);
}

#[test]
fn method_found_in_the_matching_class_of_a_multi_class_file() {
    let source = r#"<?php
class First
{
    public function run() { return 1; }
}

class Second
{
    public function run() { return 2; }
}
"#;
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("First", "pair.php").with_method("run", false));
    provider.add_class(class("Second", "pair.php").with_method("run", false));
    let (mut resolver, _) = resolver(provider, MemoryFiles::default().with("pair.php", source));

    let second = resolver.resolve_class_method("Second", "run").unwrap();
    assert_eq!(second.text, "public function run() { return 2; }");
    assert_eq!(second.class_name(), Some("Second"));
}

#[test]
fn single_class_file_is_used_when_names_differ() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("Legacy", "renamed.php").with_method("run", false));
    let (mut resolver, _) = resolver(
        provider,
        MemoryFiles::default().with("renamed.php", "<?php\nclass Renamed { public function run() {} }\n"),
    );

    let node = resolver.resolve_class_method("Legacy", "run").unwrap();
    assert_eq!(node.class_name(), Some("Renamed"));
    assert!(resolver.resolve_class_from_name("Legacy").is_none());
}

#[test]
fn inherited_method_resolves_to_declaring_file() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("Base", "base.php").with_method("boot", false));
    provider.add_class(class("Child", "child.php").with_parent("Base"));
    let (mut resolver, files) = resolver(
        provider,
        MemoryFiles::default()
            .with("base.php", "<?php\nclass Base { public function boot() {} }\n")
            .with("child.php", "<?php\nclass Child extends Base {}\n"),
    );

    let node = resolver.resolve_class_method("Child", "boot").unwrap();
    assert_eq!(node.path, PathBuf::from("base.php"));
    assert_eq!(node.class_name(), Some("Base"));
    assert_eq!(files.reads(), 1);
}

#[test]
fn method_missing_from_class_body() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("Stale", "stale.php").with_method("old", false));
    let (mut resolver, _) = resolver(
        provider,
        MemoryFiles::default().with("stale.php", "<?php\nclass Stale { public function fresh() {} }\n"),
    );

    assert!(resolver.resolve_class_method("Stale", "old").is_none());
    let key = ResolutionCache::method_key(SymbolKey::new("Stale", Some(Path::new("stale.php"))), "old");
    assert_eq!(
        resolver.cache().method(&key).and_then(|entry| entry.miss_reason()),
        Some(MissReason::MethodNotDeclared)
    );
}

fn parse(source: &str) -> SourceUnit {
    SyntaxStore::default()
        .parse_file(Path::new("caller.php"), source)
        .unwrap()
}

#[test]
fn call_sites_resolve_to_method_declarations() {
    let caller = parse(
        r#"<?php
$a = new A();
$a->run();
A::make();
$a->$name();
"#,
    );
    let locator = NodeLocator::new();
    let method_call = locator
        .find_first_of_kind(&caller.arena, caller.root, &[SyntaxKind::MethodCall])
        .unwrap();
    let calls = locator.find_all_of_kind(&caller.arena, caller.root, &[SyntaxKind::MethodCall]);
    let static_call = locator
        .find_first_of_kind(&caller.arena, caller.root, &[SyntaxKind::StaticCall])
        .unwrap();

    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("A", "a.php").with_method("run", false).with_method("make", true));
    let (mut resolver, _) = resolver(provider, MemoryFiles::default().with("a.php", A_PHP));

    let run = resolver
        .resolve_class_method_from_call(&caller.arena, method_call)
        .unwrap();
    assert_eq!(run.name, "run");
    let make = resolver
        .resolve_class_method_from_call(&caller.arena, static_call)
        .unwrap();
    assert_eq!(make.name, "make");

    assert_eq!(calls.len(), 2);
    assert!(resolver.resolve_class_method_from_call(&caller.arena, calls[1]).is_none());
    assert!(resolver
        .resolve_class_method_from_method_call(&caller.arena, static_call)
        .is_none());
    assert!(resolver
        .resolve_class_method_from_method_call(&caller.arena, method_call)
        .is_some());
    assert!(resolver.resolve_class_method_from_call(&caller.arena, caller.root).is_none());
}

/// Types every receiver as `A`.
struct AlwaysA;

impl NodeTypeResolver for AlwaysA {
    fn resolve(&self, _arena: &NodeArena, _node: NodeIndex) -> SemanticType {
        SemanticType::object("A")
    }
}

struct RejectAll;

impl SourceParser for RejectAll {
    fn parse(&self, _path: &Path, _text: &str) -> Option<SourceUnit> {
        None
    }
}

#[test]
fn injected_collaborators_are_used() {
    let caller = parse("<?php\nfunction go($unknown) { $unknown->run(); }\n");
    let call = NodeLocator::new()
        .find_first_of_kind(&caller.arena, caller.root, &[SyntaxKind::MethodCall])
        .unwrap();
    let provider = || {
        let mut provider = InMemoryReflectionProvider::new();
        provider.add_class(class("A", "a.php").with_method("run", false));
        provider
    };

    let (mut local, _) = resolver(provider(), MemoryFiles::default().with("a.php", A_PHP));
    assert!(local.resolve_class_method_from_call(&caller.arena, call).is_none());

    let (typed, _) = resolver(provider(), MemoryFiles::default().with("a.php", A_PHP));
    let mut typed = typed.with_node_type_resolver(Arc::new(AlwaysA));
    assert_eq!(
        typed
            .resolve_class_method_from_call(&caller.arena, call)
            .map(|node| node.name.clone()),
        Some("run".to_string())
    );

    let (rejecting, files) = resolver(provider(), MemoryFiles::default().with("a.php", A_PHP));
    let mut rejecting = rejecting
        .with_syntax_store(SyntaxStore::new(Arc::new(RejectAll), Arc::new(ScopeDecorator)));
    assert!(rejecting.resolve_class_method("A", "run").is_none());
    assert_eq!(files.reads(), 1);
    let key = ResolutionCache::method_key(SymbolKey::new("A", Some(Path::new("a.php"))), "run");
    assert_eq!(
        rejecting.cache().method(&key).and_then(|entry| entry.miss_reason()),
        Some(MissReason::UnparseableFile)
    );
}

#[test]
fn object_types_resolve_to_class_declarations() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("App\\User", "user.php"));
    let (mut resolver, _) = resolver(
        provider,
        MemoryFiles::default().with("user.php", "<?php\nnamespace App;\nclass User {}\n"),
    );

    let user = resolver
        .resolve_class_from_object_type(&SemanticType::nullable(SemanticType::object("App\\User")))
        .unwrap();
    assert_eq!(user.kind, SyntaxKind::ClassDeclaration);
    assert_eq!(user.class_name(), Some("App\\User"));
    assert!(resolver.resolve_class_from_object_type(&SemanticType::String).is_none());
    assert!(resolver.resolve_class_from_object_type(&SemanticType::Null).is_none());
}

#[test]
fn reset_forgets_everything() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(class("A", "a.php").with_method("run", false));
    let (mut resolver, files) = resolver(provider, MemoryFiles::default().with("a.php", A_PHP));

    let before = resolver.resolve_class_method("A", "run").unwrap();
    resolver.reset();
    assert!(resolver.cache().is_empty());
    assert_eq!(resolver.stats().cache_misses, 0);

    let after = resolver.resolve_class_method("A", "run").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);
    assert_eq!(files.reads(), 2);
}

#[test]
fn namespaced_function_falls_back_to_global() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_function(FunctionReflection::new("strlen", None));
    let resolver = AstResolver::new(Arc::new(provider), Arc::new(FsFileReader));

    let function = resolver
        .reflection()
        .resolve_function_reflection("App\\strlen")
        .unwrap();
    assert_eq!(function.name, "strlen");
    assert!(resolver.reflection().resolve_function_reflection("App\\missing").is_none());
}

#[test]
fn resolves_against_an_indexed_project() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(
        src.join("Repository.php"),
        r#"<?php
namespace App;

class Repository
{
    public function find($id)
    {
        return new Record();
    }
}
"#,
    )
    .unwrap();
    std::fs::write(
        src.join("Record.php"),
        "<?php\nnamespace App;\n\nclass Record extends Repository {}\n",
    )
    .unwrap();

    let options = SourceIndexOptions {
        roots: vec![src],
        ..SourceIndexOptions::default()
    };
    let provider = SourceIndexReflectionProvider::build(&options, &FsFileReader);
    assert!(provider.has_class("App\\Record"));
    let mut resolver = AstResolver::new(Arc::new(provider), Arc::new(FsFileReader));

    let find = resolver.resolve_class_method("App\\Record", "find").unwrap();
    assert!(find.path.ends_with("Repository.php"));
    assert_eq!(find.class_name(), Some("App\\Repository"));
    assert!(find.text.contains("return new Record();"));

    let record = resolver.resolve_class_from_name("\\App\\Record").unwrap();
    assert!(record.path.ends_with("Record.php"));
}

#[test]
fn closures_in_a_sibling_method_do_not_hide_the_class() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Repo.php"),
        r#"<?php
namespace App;

class Repo
{
    public function find($id)
    {
        return $this->rows[$id];
    }

    public function all()
    {
        $ids = array_map(function ($row) { return $row->id; }, $this->rows);
        return array_filter($ids, fn($id) => match ($id) { 0 => false, default => true });
    }
}
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("Suit.php"),
        r#"<?php
namespace App;

enum Suit: string
{
    case Hearts = 'H';

    public function color(): string
    {
        return 'Red';
    }
}
"#,
    )
    .unwrap();

    let options = SourceIndexOptions {
        roots: vec![dir.path().to_path_buf()],
        ..SourceIndexOptions::default()
    };
    let provider = SourceIndexReflectionProvider::build(&options, &FsFileReader);
    assert!(provider.skipped_files().is_empty());
    assert!(provider.has_class("App\\Repo"));
    assert_eq!(
        provider.get_class("App\\Suit").map(|class| class.kind),
        Some(ClassKind::Enum)
    );
    let mut resolver = AstResolver::new(Arc::new(provider), Arc::new(FsFileReader));

    let find = resolver.resolve_class_method("App\\Repo", "find").unwrap();
    assert!(find.text.contains("return $this->rows[$id];"));
    let all = resolver.resolve_class_method("App\\Repo", "all").unwrap();
    assert!(all.text.contains("fn($id) => match ($id)"));

    let color = resolver.resolve_class_method("App\\Suit", "color").unwrap();
    assert_eq!(color.kind, SyntaxKind::MethodDeclaration);
    assert_eq!(color.class_name(), Some("App\\Suit"));
}
