//! Mapping between semantic types and type syntax for the phz rewriting core.
//!
//! This crate provides:
//! - `TypeMapperRegistry` - Ordered, first-accept-wins mapper dispatch
//! - `TypeMapper` - One mapping strategy per semantic type shape
//! - `DocTypeNode` - Doc-comment type syntax
//! - `TypeContext` - Scope needed to read an annotation back into a semantic type
//!
//! Semantic types (`phz-types`) and annotation syntax (`phz-parser`) stay
//! separate models; this crate is the only place they meet.

pub mod doc_type_node;
pub use doc_type_node::DocTypeNode;

pub mod error;
pub use error::TypeMapperError;

pub mod inverse;
pub use inverse::TypeContext;

pub mod mapper;
pub use mapper::TypeMapper;

pub mod mappers;

pub mod registry;
pub use registry::TypeMapperRegistry;

pub mod type_kind;
pub use type_kind::TypeKind;

#[cfg(test)]
#[path = "../tests/doc_type_node_tests.rs"]
mod doc_type_node_tests;
