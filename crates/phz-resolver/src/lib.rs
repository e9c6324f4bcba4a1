//! Declaration resolution for the phz rewriting core.
//!
//! This crate provides:
//! - `AstResolver` - Reflection handle to declaration syntax, memoized per symbol
//! - `ResolutionCache` / `CacheEntry` - Found-or-missing memo tables
//! - `ReflectionResolver` - Name based reflection lookups
//! - `NodeTypeResolver` / `LocalNodeTypeResolver` - Static types of receiver expressions
//! - `SourceIndexReflectionProvider` - Reflection built from project sources
//! - `FileReader` / `FsFileReader` - Injected file access

pub mod ast_resolver;
pub use ast_resolver::AstResolver;

pub mod cache;
pub use cache::{CacheEntry, MissReason, ResolutionCache, ResolutionStats, SymbolKey};

pub mod file_system;
pub use file_system::{FileReader, FsFileReader};

pub mod node_type_resolver;
pub use node_type_resolver::{LocalNodeTypeResolver, NodeTypeResolver};

pub mod reflection_resolver;
pub use reflection_resolver::ReflectionResolver;

pub mod resolved_node;
pub use resolved_node::{ResolvedDeclaration, ResolvedNode};

pub mod source_index;
pub use source_index::{SourceIndexOptions, SourceIndexReflectionProvider, discover_files};

#[cfg(test)]
#[path = "../tests/node_type_resolver_tests.rs"]
mod node_type_resolver_tests;

#[cfg(test)]
#[path = "../tests/source_index_tests.rs"]
mod source_index_tests;
