//! Ordered mapper dispatch.
//!
//! The registry holds mappers in registration order and hands each type to
//! the first mapper that accepts it. Acceptance is a sub-shape test, so a
//! mapper for a general shape (object) also accepts the specific ones (self,
//! static, generic object). Whoever assembles the registry must register the
//! specific mappers first; `with_default_mappers` does.

use crate::doc_type_node::DocTypeNode;
use crate::error::TypeMapperError;
use crate::inverse::{TypeContext, semantic_type_from_node};
use crate::mapper::TypeMapper;
use crate::mappers::{
    ArrayTypeMapper, BooleanTypeMapper, CallableTypeMapper, ClassStringTypeMapper,
    FloatTypeMapper, GenericObjectTypeMapper, IntegerTypeMapper, IntersectionTypeMapper,
    IterableTypeMapper, MixedTypeMapper, NeverTypeMapper, NullTypeMapper, NullableTypeMapper,
    ObjectTypeMapper, ObjectWithoutClassTypeMapper, ParentReferenceTypeMapper,
    ResourceTypeMapper, SelfReferenceTypeMapper, StaticReferenceTypeMapper, StringTypeMapper,
    UnionTypeMapper, VoidTypeMapper,
};
use crate::type_kind::TypeKind;
use phz_common::{PhpVersion, PhpVersionFeature};
use phz_parser::TypeNode;
use phz_types::SemanticType;
use std::fmt;
use tracing::trace;

pub struct TypeMapperRegistry {
    mappers: Vec<Box<dyn TypeMapper>>,
    php_version: PhpVersion,
}

impl TypeMapperRegistry {
    /// Empty registry targeting `php_version`.
    pub fn new(php_version: PhpVersion) -> TypeMapperRegistry {
        TypeMapperRegistry {
            mappers: Vec::new(),
            php_version,
        }
    }

    /// One mapper per shape, most specific shapes first.
    pub fn with_default_mappers(php_version: PhpVersion) -> TypeMapperRegistry {
        TypeMapperRegistry::new(php_version)
            .add_mapper(MixedTypeMapper)
            .add_mapper(VoidTypeMapper)
            .add_mapper(NeverTypeMapper)
            .add_mapper(NullTypeMapper)
            .add_mapper(BooleanTypeMapper)
            .add_mapper(IntegerTypeMapper)
            .add_mapper(FloatTypeMapper)
            .add_mapper(ClassStringTypeMapper)
            .add_mapper(StringTypeMapper)
            .add_mapper(CallableTypeMapper)
            .add_mapper(IterableTypeMapper)
            .add_mapper(ArrayTypeMapper)
            .add_mapper(ResourceTypeMapper)
            .add_mapper(ObjectWithoutClassTypeMapper)
            .add_mapper(SelfReferenceTypeMapper)
            .add_mapper(StaticReferenceTypeMapper)
            .add_mapper(ParentReferenceTypeMapper)
            .add_mapper(GenericObjectTypeMapper)
            .add_mapper(ObjectTypeMapper)
            .add_mapper(UnionTypeMapper)
            .add_mapper(NullableTypeMapper)
            .add_mapper(IntersectionTypeMapper)
    }

    /// Append a mapper after the ones already registered.
    pub fn add_mapper<M>(mut self, mapper: M) -> TypeMapperRegistry
    where
        M: TypeMapper + 'static,
    {
        self.mappers.push(Box::new(mapper));
        self
    }

    pub fn push(&mut self, mapper: Box<dyn TypeMapper>) {
        self.mappers.push(mapper);
    }

    pub fn php_version(&self) -> PhpVersion {
        self.php_version
    }

    #[inline]
    pub fn supports(&self, feature: PhpVersionFeature) -> bool {
        self.php_version.supports(feature)
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    fn select(&self, ty: &SemanticType, kind: TypeKind) -> Result<&dyn TypeMapper, TypeMapperError> {
        let mapper = self
            .mappers
            .iter()
            .find(|mapper| mapper.accepts(ty))
            .ok_or(TypeMapperError::UnsupportedTypeShape {
                shape: ty.shape(),
                kind,
            })?;
        trace!(shape = %ty.shape(), mapper = mapper.name(), "type mapper selected");
        Ok(mapper.as_ref())
    }

    /// Doc-comment form of `ty`. Fails only when no mapper accepts the shape.
    pub fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
    ) -> Result<DocTypeNode, TypeMapperError> {
        self.select(ty, kind)?.to_doc_type_node(ty, kind, self)
    }

    /// Annotation form of `ty`, or `Ok(None)` when it has none in this
    /// position for the target version. Callers fall back to the doc form.
    pub fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let mapper = self.select(ty, kind)?;
        if kind == TypeKind::Property && !self.supports(PhpVersionFeature::TypedProperties) {
            return Ok(None);
        }
        mapper.to_syntax_type_node(ty, kind, self)
    }

    /// Semantic type written by an annotation.
    pub fn to_semantic_type(&self, node: &TypeNode, context: &TypeContext<'_>) -> SemanticType {
        semantic_type_from_node(node, context)
    }
}

impl fmt::Debug for TypeMapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapperRegistry")
            .field("php_version", &self.php_version)
            .field(
                "mappers",
                &self.mappers.iter().map(|mapper| mapper.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
