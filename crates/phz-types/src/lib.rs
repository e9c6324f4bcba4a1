//! Semantic type model and reflection contracts for the phz rewriting core.
//!
//! - `SemanticType` / `TypeShape` - What a value is, independent of syntax
//! - `ClassReflection`, `MethodReflection`, `FunctionReflection` - Reflection handles
//! - `ReflectionProvider` - Lookup contract for reflection data

pub mod semantic_type;
pub use semantic_type::{SemanticType, TypeShape};

// Display impl for SemanticType
mod type_printer;

pub mod reflection;
pub use reflection::{
    ClassKind, ClassReflection, DeclaredMethod, FunctionReflection, InMemoryReflectionProvider,
    MethodReflection, ReflectionProvider, find_declaring_method, normalize_name,
};

#[cfg(test)]
#[path = "../tests/semantic_type_tests.rs"]
mod semantic_type_tests;

#[cfg(test)]
#[path = "../tests/reflection_tests.rs"]
mod reflection_tests;
