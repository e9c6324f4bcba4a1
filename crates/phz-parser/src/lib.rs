//! PHP declaration parser for the phz rewriting core.
//!
//! This crate provides the syntax side of resolution:
//! - `ParserState` - Recursive descent parser producing a `NodeArena`
//! - `NodeArena` - Index-based node storage with decoration metadata
//! - `TypeNode` - Owned type-annotation nodes
//! - `NodeLocator` - Predicate and kind based node search
//! - `Decorator` / `ScopeDecorator` - Namespace, import and enclosing-declaration metadata
//! - `SyntaxStore` - Parse-then-decorate pipeline for single files

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod node;
pub use node::*;

pub mod node_arena;
pub use node_arena::NodeArena;

// Typed payload accessors on NodeArena
mod node_access;

pub mod type_node;
pub use type_node::TypeNode;

// Parser state and parse methods
pub mod state;
mod state_expressions;
mod state_statements;
mod state_types;
pub use state::{ParseDiagnostic, ParserState};

pub mod locator;
pub use locator::NodeLocator;

pub mod decorator;
pub use decorator::{Decorator, ScopeDecorator};

pub mod syntax_store;
pub use syntax_store::{PhpSourceParser, SourceParser, SourceUnit, SyntaxStore};

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod node_arena_tests;

#[cfg(test)]
#[path = "../tests/decorator_tests.rs"]
mod decorator_tests;
