//! Reflection built from the project's own source files.
//!
//! The index walks the configured roots, parses every matching file in
//! parallel and records class-likes (with parent, interfaces, traits and
//! declared methods) and functions. Native PHP classes come from a small
//! built-in table and have no file.

use crate::file_system::FileReader;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use phz_parser::{ModifierFlags, NodeIndex, NodeLocator, SourceUnit, SyntaxStore};
use phz_scanner::SyntaxKind;
use phz_types::{ClassKind, ClassReflection, FunctionReflection, ReflectionProvider};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Clone, Debug)]
pub struct SourceIndexOptions {
    /// Directories or single files to index.
    pub roots: Vec<PathBuf>,
    /// Paths skipped together with everything below them.
    pub exclude: Vec<PathBuf>,
    /// File extensions without the dot.
    pub extensions: Vec<String>,
    /// Extra class names treated as native.
    pub builtin_classes: Vec<String>,
}

impl Default for SourceIndexOptions {
    fn default() -> Self {
        SourceIndexOptions {
            roots: Vec::new(),
            exclude: Vec::new(),
            extensions: vec!["php".to_string()],
            builtin_classes: Vec::new(),
        }
    }
}

/// (name, parent, interfaces, methods); a `::` prefix marks a static method.
type BuiltinClass = (
    &'static str,
    Option<&'static str>,
    &'static [&'static str],
    &'static [&'static str],
);

const THROWABLE_METHODS: &[&str] = &[
    "getMessage",
    "getCode",
    "getPrevious",
    "getFile",
    "getLine",
    "getTrace",
    "getTraceAsString",
    "__toString",
];

const BUILTIN_CLASSES: &[BuiltinClass] = &[
    ("stdClass", None, &[], &[]),
    ("Exception", None, &["Throwable"], THROWABLE_METHODS),
    ("Error", None, &["Throwable"], THROWABLE_METHODS),
    ("ErrorException", Some("Exception"), &[], &["getSeverity"]),
    ("LogicException", Some("Exception"), &[], &[]),
    ("RuntimeException", Some("Exception"), &[], &[]),
    ("InvalidArgumentException", Some("LogicException"), &[], &[]),
    ("DomainException", Some("LogicException"), &[], &[]),
    ("TypeError", Some("Error"), &[], &[]),
    (
        "ArrayObject",
        None,
        &["IteratorAggregate", "ArrayAccess", "Countable"],
        &[
            "getIterator",
            "offsetExists",
            "offsetGet",
            "offsetSet",
            "offsetUnset",
            "count",
            "getArrayCopy",
            "append",
        ],
    ),
    (
        "ArrayIterator",
        None,
        &["Iterator", "ArrayAccess", "Countable"],
        &["current", "key", "next", "rewind", "valid", "count"],
    ),
    (
        "DateTime",
        None,
        &["DateTimeInterface"],
        &[
            "format",
            "modify",
            "setDate",
            "setTime",
            "setTimezone",
            "getTimestamp",
            "::createFromFormat",
        ],
    ),
    (
        "DateTimeImmutable",
        None,
        &["DateTimeInterface"],
        &[
            "format",
            "modify",
            "setDate",
            "setTime",
            "setTimezone",
            "getTimestamp",
            "::createFromFormat",
        ],
    ),
    (
        "Closure",
        None,
        &[],
        &["call", "bindTo", "::bind", "::fromCallable"],
    ),
];

const BUILTIN_INTERFACES: &[BuiltinClass] = &[
    ("Throwable", Some("Stringable"), &[], THROWABLE_METHODS),
    ("Stringable", None, &[], &["__toString"]),
    ("Traversable", None, &[], &[]),
    (
        "Iterator",
        Some("Traversable"),
        &[],
        &["current", "key", "next", "rewind", "valid"],
    ),
    ("IteratorAggregate", Some("Traversable"), &[], &["getIterator"]),
    (
        "ArrayAccess",
        None,
        &[],
        &["offsetExists", "offsetGet", "offsetSet", "offsetUnset"],
    ),
    ("Countable", None, &[], &["count"]),
    ("JsonSerializable", None, &[], &["jsonSerialize"]),
    (
        "DateTimeInterface",
        None,
        &[],
        &["format", "getTimestamp"],
    ),
];

const BUILTIN_FUNCTIONS: &[&str] = &[
    "array_filter",
    "array_key_exists",
    "array_keys",
    "array_map",
    "array_merge",
    "count",
    "explode",
    "implode",
    "in_array",
    "is_array",
    "is_null",
    "json_decode",
    "json_encode",
    "sprintf",
    "str_replace",
    "strlen",
    "strtolower",
    "substr",
];

static BUILTINS: Lazy<IndexMap<String, Arc<ClassReflection>>> = Lazy::new(|| {
    let interfaces = BUILTIN_INTERFACES
        .iter()
        .map(|entry| builtin_class(entry, ClassKind::Interface));
    let classes = BUILTIN_CLASSES
        .iter()
        .map(|entry| builtin_class(entry, ClassKind::Class));
    interfaces
        .chain(classes)
        .map(|class| (class.name.to_ascii_lowercase(), Arc::new(class)))
        .collect()
});

static BUILTIN_FUNCTION_TABLE: Lazy<IndexMap<String, Arc<FunctionReflection>>> = Lazy::new(|| {
    BUILTIN_FUNCTIONS
        .iter()
        .map(|name| {
            (
                name.to_string(),
                Arc::new(FunctionReflection::new(name, None)),
            )
        })
        .collect()
});

fn builtin_class(entry: &BuiltinClass, kind: ClassKind) -> ClassReflection {
    let (name, parent, interfaces, methods) = *entry;
    let mut class = ClassReflection {
        kind,
        ..ClassReflection::builtin(name)
    };
    // For interfaces the parent slot holds the extended interface.
    match (kind, parent) {
        (ClassKind::Interface, Some(parent)) => class = class.with_interface(parent),
        (_, Some(parent)) => class = class.with_parent(parent),
        _ => {}
    }
    for interface in interfaces {
        class = class.with_interface(interface);
    }
    for method in methods {
        class = match method.strip_prefix("::") {
            Some(name) => class.with_method(name, true),
            None => class.with_method(method, false),
        };
    }
    class
}

/// Everything declared in one file.
#[derive(Debug, Default)]
struct FileSymbols {
    classes: Vec<ClassReflection>,
    functions: Vec<FunctionReflection>,
}

#[derive(Debug, Default)]
pub struct SourceIndexReflectionProvider {
    classes: IndexMap<String, Arc<ClassReflection>>,
    functions: IndexMap<String, Arc<FunctionReflection>>,
    extra_builtins: IndexMap<String, Arc<ClassReflection>>,
    files: Vec<PathBuf>,
    skipped_files: Vec<PathBuf>,
}

impl SourceIndexReflectionProvider {
    /// Discover and index all files under the configured roots.
    pub fn build(options: &SourceIndexOptions, reader: &dyn FileReader) -> SourceIndexReflectionProvider {
        let files = discover_files(options);
        SourceIndexReflectionProvider::from_files(&files, &options.builtin_classes, reader)
    }

    pub fn from_files(
        files: &[PathBuf],
        builtin_classes: &[String],
        reader: &dyn FileReader,
    ) -> SourceIndexReflectionProvider {
        let store = SyntaxStore::default();
        let indexed: Vec<(PathBuf, Option<FileSymbols>)> = files
            .par_iter()
            .map(|path| (path.clone(), index_file(&store, reader, path)))
            .collect();

        let mut index = SourceIndexReflectionProvider::default();
        for name in builtin_classes {
            let class = ClassReflection::builtin(name);
            index
                .extra_builtins
                .insert(class.name.to_ascii_lowercase(), Arc::new(class));
        }
        for (path, symbols) in indexed {
            let Some(symbols) = symbols else {
                index.skipped_files.push(path);
                continue;
            };
            for class in symbols.classes {
                let key = class.name.to_ascii_lowercase();
                if let Some(existing) = index.classes.get(&key) {
                    debug!(
                        class = %class.name,
                        first = ?existing.file_name,
                        "duplicate class declaration ignored"
                    );
                    continue;
                }
                index.classes.insert(key, Arc::new(class));
            }
            for function in symbols.functions {
                let key = function.name.to_ascii_lowercase();
                index.functions.entry(key).or_insert_with(|| Arc::new(function));
            }
            index.files.push(path);
        }
        info!(
            files = index.files.len(),
            skipped = index.skipped_files.len(),
            classes = index.classes.len(),
            functions = index.functions.len(),
            "source index built"
        );
        index
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Files that were indexed, in discovery order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Files that could not be read or parsed.
    pub fn skipped_files(&self) -> &[PathBuf] {
        &self.skipped_files
    }

    /// Classes declared in project files.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassReflection>> {
        self.classes.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Arc<FunctionReflection>> {
        self.functions.values()
    }
}

impl ReflectionProvider for SourceIndexReflectionProvider {
    fn get_class(&self, name: &str) -> Option<Arc<ClassReflection>> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        self.classes
            .get(&key)
            .or_else(|| self.extra_builtins.get(&key))
            .or_else(|| BUILTINS.get(&key))
            .cloned()
    }

    fn get_function(&self, name: &str) -> Option<Arc<FunctionReflection>> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        self.functions
            .get(&key)
            .or_else(|| BUILTIN_FUNCTION_TABLE.get(&key))
            .cloned()
    }
}

/// Files under `options.roots` with a matching extension, sorted and
/// deduplicated.
pub fn discover_files(options: &SourceIndexOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in &options.roots {
        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry.path(), &options.exclude))
            .filter_map(|entry| entry.ok());
        for entry in walker {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let matches_extension = path.extension().is_some_and(|ext| {
                options
                    .extensions
                    .iter()
                    .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
            });
            if matches_extension {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_excluded(path: &Path, exclude: &[PathBuf]) -> bool {
    exclude.iter().any(|excluded| path.starts_with(excluded))
}

fn index_file(store: &SyntaxStore, reader: &dyn FileReader, path: &Path) -> Option<FileSymbols> {
    let text = match reader.read_file(path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable file");
            return None;
        }
    };
    let unit = store.parse_file(path, &text)?;
    Some(collect_symbols(&unit))
}

fn collect_symbols(unit: &SourceUnit) -> FileSymbols {
    let arena = &unit.arena;
    let locator = NodeLocator::new();
    let mut symbols = FileSymbols::default();

    for index in locator.find_class_likes(arena, unit.root) {
        let Some(node) = arena.get(index) else {
            continue;
        };
        let (Some(data), Some(name)) = (arena.get_class_like(node), arena.resolved_name(index)) else {
            continue;
        };
        let kind = match node.kind {
            SyntaxKind::InterfaceDeclaration => ClassKind::Interface,
            SyntaxKind::TraitDeclaration => ClassKind::Trait,
            SyntaxKind::EnumDeclaration => ClassKind::Enum,
            _ => ClassKind::Class,
        };
        let mut class = ClassReflection::new(name, kind).with_file(unit.path.clone());
        for (i, parent) in resolved_names(arena, data.extends.iter()).enumerate() {
            class = if kind == ClassKind::Class && i == 0 {
                class.with_parent(parent)
            } else {
                class.with_interface(parent)
            };
        }
        for interface in resolved_names(arena, data.implements.iter()) {
            class = class.with_interface(interface);
        }
        for member in data.members.iter() {
            let Some(member_node) = arena.get(member) else {
                continue;
            };
            match member_node.kind {
                SyntaxKind::TraitUse => {
                    if let Some(trait_use) = arena.get_trait_use(member_node) {
                        for name in resolved_names(arena, trait_use.traits.iter()) {
                            class = class.with_trait(name);
                        }
                    }
                }
                SyntaxKind::MethodDeclaration => {
                    let is_static = arena
                        .get_function(member_node)
                        .is_some_and(|function| function.modifiers.contains(ModifierFlags::STATIC));
                    if let Some(method) = arena.declaration_name(member) {
                        class = class.with_method(method, is_static);
                    }
                }
                _ => {}
            }
        }
        symbols.classes.push(class);
    }

    for index in locator.find_all_of_kind(arena, unit.root, &[SyntaxKind::FunctionDeclaration]) {
        if let Some(name) = arena.resolved_name(index) {
            symbols
                .functions
                .push(FunctionReflection::new(name, Some(unit.path.clone())));
        }
    }
    symbols
}

fn resolved_names<'a>(
    arena: &'a phz_parser::NodeArena,
    nodes: impl Iterator<Item = NodeIndex> + 'a,
) -> impl Iterator<Item = &'a str> + 'a {
    nodes.filter_map(move |index| arena.resolved_name(index))
}
