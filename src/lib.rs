//! phz: AST resolution and type mapping core for automated PHP rewriting.
//!
//! The work is split across the workspace crates:
//! - `phz_parser` - Parsing and scope decoration of PHP files
//! - `phz_types` - Semantic types and reflection
//! - `phz_resolver` - Cached resolution from reflection to declaration syntax
//! - `phz_mapper` - Semantic type to phpdoc / native annotation mapping
//!
//! This crate adds the command-line front end and its configuration.

pub use phz_mapper as mapper;
pub use phz_resolver as resolver;
pub use phz_types as types;

pub mod cli;

pub mod tracing_config;
