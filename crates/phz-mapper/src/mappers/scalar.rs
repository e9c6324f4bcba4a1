//! Keyword types and collections.

use super::wrong_shape;
use crate::doc_type_node::DocTypeNode;
use crate::error::TypeMapperError;
use crate::mapper::TypeMapper;
use crate::registry::TypeMapperRegistry;
use crate::type_kind::TypeKind;
use phz_common::PhpVersionFeature;
use phz_parser::TypeNode;
use phz_types::{SemanticType, TypeShape};

/// Mapper for a shape written as a single keyword in both forms. `$allowed`
/// decides whether the annotation form is available.
macro_rules! keyword_mapper {
    ($(#[$meta:meta])* $name:ident, $shape:ident, $keyword:literal, |$registry:ident, $kind:ident| $allowed:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl TypeMapper for $name {
            fn shape(&self) -> TypeShape {
                TypeShape::$shape
            }

            fn to_doc_type_node(
                &self,
                _ty: &SemanticType,
                _kind: TypeKind,
                _registry: &TypeMapperRegistry,
            ) -> Result<DocTypeNode, TypeMapperError> {
                Ok(DocTypeNode::identifier($keyword))
            }

            #[allow(unused_variables)]
            fn to_syntax_type_node(
                &self,
                _ty: &SemanticType,
                $kind: TypeKind,
                $registry: &TypeMapperRegistry,
            ) -> Result<Option<TypeNode>, TypeMapperError> {
                Ok(($allowed).then(|| TypeNode::identifier($keyword)))
            }
        }
    };
}

keyword_mapper!(MixedTypeMapper, Mixed, "mixed", |registry, kind| registry
    .supports(PhpVersionFeature::MixedType));

keyword_mapper!(
    /// `void` is a return-only type.
    VoidTypeMapper,
    Void,
    "void",
    |registry, kind| kind == TypeKind::Return && registry.supports(PhpVersionFeature::VoidType)
);

keyword_mapper!(
    NeverTypeMapper,
    Never,
    "never",
    |registry, kind| kind == TypeKind::Return && registry.supports(PhpVersionFeature::NeverType)
);

keyword_mapper!(
    /// A standalone `null` annotation is never produced; `null` only appears
    /// as a union member.
    NullTypeMapper,
    Null,
    "null",
    |registry, kind| false
);

keyword_mapper!(BooleanTypeMapper, Boolean, "bool", |registry, kind| registry
    .supports(PhpVersionFeature::ScalarTypes));

keyword_mapper!(IntegerTypeMapper, Integer, "int", |registry, kind| registry
    .supports(PhpVersionFeature::ScalarTypes));

keyword_mapper!(FloatTypeMapper, Float, "float", |registry, kind| registry
    .supports(PhpVersionFeature::ScalarTypes));

keyword_mapper!(StringTypeMapper, String, "string", |registry, kind| registry
    .supports(PhpVersionFeature::ScalarTypes));

keyword_mapper!(
    /// Properties cannot be typed `callable`.
    CallableTypeMapper,
    Callable,
    "callable",
    |registry, kind| kind != TypeKind::Property
);

keyword_mapper!(ResourceTypeMapper, Resource, "resource", |registry, kind| false);

keyword_mapper!(
    ObjectWithoutClassTypeMapper,
    ObjectWithoutClass,
    "object",
    |registry, kind| registry.supports(PhpVersionFeature::ObjectType)
);

/// `class-string<T>` in docs, `string` as an annotation. Must come before
/// `StringTypeMapper`, which also accepts it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassStringTypeMapper;

impl TypeMapper for ClassStringTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::ClassString
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        match ty {
            SemanticType::ClassString(Some(class)) => Ok(DocTypeNode::generic(
                "class-string",
                vec![DocTypeNode::class(class)],
            )),
            SemanticType::ClassString(None) => Ok(DocTypeNode::identifier("class-string")),
            _ => Err(wrong_shape(ty, kind)),
        }
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        Ok(registry
            .supports(PhpVersionFeature::ScalarTypes)
            .then(|| TypeNode::identifier("string")))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IterableTypeMapper;

impl TypeMapper for IterableTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Iterable
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::Iterable(item) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        if **item == SemanticType::Mixed {
            return Ok(DocTypeNode::identifier("iterable"));
        }
        let item = registry.to_doc_type_node(item, TypeKind::Any)?;
        Ok(DocTypeNode::generic("iterable", vec![item]))
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        Ok(registry
            .supports(PhpVersionFeature::IterableType)
            .then(|| TypeNode::identifier("iterable")))
    }
}

/// Arrays print as `T[]` when only the item type is known and as
/// `array<K, V>` when the key type is too.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayTypeMapper;

impl TypeMapper for ArrayTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Array
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::Array { key, item } = ty else {
            return Err(wrong_shape(ty, kind));
        };
        match (&**key, &**item) {
            (SemanticType::Mixed, SemanticType::Mixed) => Ok(DocTypeNode::identifier("array")),
            (SemanticType::Mixed | SemanticType::Integer, item) => {
                let item = registry.to_doc_type_node(item, TypeKind::Any)?;
                Ok(DocTypeNode::Array(Box::new(item)))
            }
            (key, item) => {
                let key = registry.to_doc_type_node(key, TypeKind::Any)?;
                let item = registry.to_doc_type_node(item, TypeKind::Any)?;
                Ok(DocTypeNode::generic("array", vec![key, item]))
            }
        }
    }

    fn to_syntax_type_node(
        &self,
        _ty: &SemanticType,
        _kind: TypeKind,
        _registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        Ok(Some(TypeNode::identifier("array")))
    }
}
