//! Memoization tables for declaration lookups.
//!
//! Each table maps a lookup key to either a found declaration or the reason
//! it could not be found. A key that is absent has not been attempted yet.
//! Negative entries are never retried during a run.

use crate::resolved_node::ResolvedNode;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a declaration could not be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MissReason {
    /// Symbol has no source file (built-in or extension).
    NativeSymbol,
    UnreadableFile,
    UnparseableFile,
    /// File parsed, but the declaration is not in it.
    DeclarationNotFound,
    /// The class-like was found but does not declare the method itself.
    MethodNotDeclared,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MissReason::NativeSymbol => "native symbol",
            MissReason::UnreadableFile => "unreadable file",
            MissReason::UnparseableFile => "unparseable file",
            MissReason::DeclarationNotFound => "declaration not found",
            MissReason::MethodNotDeclared => "method not declared in class body",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CacheEntry {
    Found(ResolvedNode),
    Missing(MissReason),
}

impl CacheEntry {
    pub fn found(&self) -> Option<ResolvedNode> {
        match self {
            CacheEntry::Found(node) => Some(ResolvedNode::clone(node)),
            CacheEntry::Missing(_) => None,
        }
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            CacheEntry::Found(_) => None,
            CacheEntry::Missing(reason) => Some(*reason),
        }
    }
}

impl From<Result<ResolvedNode, MissReason>> for CacheEntry {
    fn from(result: Result<ResolvedNode, MissReason>) -> Self {
        match result {
            Ok(node) => CacheEntry::Found(node),
            Err(reason) => CacheEntry::Missing(reason),
        }
    }
}

/// Counters for cache behavior and file work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub files_read: usize,
    pub files_parsed: usize,
    pub cache_hits: usize,
    /// Cache hits that returned a negative entry.
    pub negative_hits: usize,
    pub cache_misses: usize,
}

/// Lower-cased symbol name plus the file that defines it. Two reflections
/// with the same name but different files get separate entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    pub name: String,
    pub file: Option<PathBuf>,
}

impl SymbolKey {
    pub fn new(name: &str, file: Option<&Path>) -> SymbolKey {
        SymbolKey {
            name: name.trim_start_matches('\\').to_ascii_lowercase(),
            file: file.map(Path::to_path_buf),
        }
    }
}

/// The three memo tables.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    /// (declaring class, lower-cased method name)
    pub(crate) methods: FxHashMap<(SymbolKey, String), CacheEntry>,
    pub(crate) functions: FxHashMap<SymbolKey, CacheEntry>,
    pub(crate) classes: FxHashMap<SymbolKey, CacheEntry>,
}

impl ResolutionCache {
    pub fn new() -> ResolutionCache {
        ResolutionCache::default()
    }

    pub fn method_key(class: SymbolKey, method: &str) -> (SymbolKey, String) {
        (class, method.to_ascii_lowercase())
    }

    pub fn method(&self, key: &(SymbolKey, String)) -> Option<&CacheEntry> {
        self.methods.get(key)
    }

    pub fn function(&self, key: &SymbolKey) -> Option<&CacheEntry> {
        self.functions.get(key)
    }

    pub fn class(&self, key: &SymbolKey) -> Option<&CacheEntry> {
        self.classes.get(key)
    }

    pub fn len(&self) -> usize {
        self.methods.len() + self.functions.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.methods.clear();
        self.functions.clear();
        self.classes.clear();
    }
}
