//! Class references.

use super::wrong_shape;
use crate::doc_type_node::DocTypeNode;
use crate::error::TypeMapperError;
use crate::mapper::TypeMapper;
use crate::registry::TypeMapperRegistry;
use crate::type_kind::TypeKind;
use phz_common::PhpVersionFeature;
use phz_parser::TypeNode;
use phz_types::{SemanticType, TypeShape};

/// Any object with a known class, printed fully qualified.
///
/// Accepts every sub-shape of object, so it has to be registered after the
/// mappers for `self`, `static`, `parent` and generic objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectTypeMapper;

impl TypeMapper for ObjectTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Object
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let class = ty.class_name().ok_or_else(|| wrong_shape(ty, kind))?;
        Ok(DocTypeNode::class(class))
    }

    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let class = ty.class_name().ok_or_else(|| wrong_shape(ty, kind))?;
        Ok(Some(TypeNode::fully_qualified(class)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SelfReferenceTypeMapper;

impl TypeMapper for SelfReferenceTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::SelfReference
    }

    fn to_doc_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        Ok(DocTypeNode::identifier("self"))
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        Ok(Some(TypeNode::identifier("self")))
    }
}

/// `static` is only an annotation in return position, from PHP 8.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticReferenceTypeMapper;

impl TypeMapper for StaticReferenceTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::StaticReference
    }

    fn to_doc_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        Ok(DocTypeNode::identifier("static"))
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let allowed =
            kind == TypeKind::Return && registry.supports(PhpVersionFeature::StaticReturnType);
        Ok(allowed.then(|| TypeNode::identifier("static")))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ParentReferenceTypeMapper;

impl TypeMapper for ParentReferenceTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::ParentReference
    }

    fn to_doc_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        Ok(DocTypeNode::identifier("parent"))
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        Ok(Some(TypeNode::identifier("parent")))
    }
}

/// `\Collection<\Item>` in docs; annotations drop the type arguments.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericObjectTypeMapper;

impl TypeMapper for GenericObjectTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::GenericObject
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::GenericObject { class, args } = ty else {
            return Err(wrong_shape(ty, kind));
        };
        let args = args
            .iter()
            .map(|arg| registry.to_doc_type_node(arg, TypeKind::Any))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocTypeNode::generic(
            format!("\\{}", class.trim_start_matches('\\')),
            args,
        ))
    }

    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let SemanticType::GenericObject { class, .. } = ty else {
            return Err(wrong_shape(ty, kind));
        };
        Ok(Some(TypeNode::fully_qualified(class)))
    }
}
