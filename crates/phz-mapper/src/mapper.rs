//! The per-shape mapping strategy.

use crate::doc_type_node::DocTypeNode;
use crate::error::TypeMapperError;
use crate::registry::TypeMapperRegistry;
use crate::type_kind::TypeKind;
use phz_parser::TypeNode;
use phz_types::{SemanticType, TypeShape};

/// Maps semantic types of one shape to syntax.
///
/// Mappers for compound shapes call back into the registry for their
/// members, so nested types go through the same ordered dispatch.
pub trait TypeMapper: Send + Sync {
    /// Shape this mapper handles.
    fn shape(&self) -> TypeShape;

    /// Default: the type's shape is `shape()` or one of its sub-shapes.
    fn accepts(&self, ty: &SemanticType) -> bool {
        ty.shape().is_a(self.shape())
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError>;

    /// `Ok(None)` when the type cannot be written as an annotation in this
    /// position for the registry's target version.
    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError>;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
