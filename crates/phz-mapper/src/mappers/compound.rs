//! Unions, nullables and intersections.
//!
//! Members are mapped through the registry. If any member has no annotation
//! form the whole type has none.

use super::wrong_shape;
use crate::doc_type_node::DocTypeNode;
use crate::error::TypeMapperError;
use crate::mapper::TypeMapper;
use crate::registry::TypeMapperRegistry;
use crate::type_kind::TypeKind;
use phz_common::{PhpVersion, PhpVersionFeature};
use phz_parser::TypeNode;
use phz_types::{SemanticType, TypeShape};

#[derive(Clone, Copy, Debug, Default)]
pub struct UnionTypeMapper;

impl TypeMapper for UnionTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Union
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::Union(members) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        let mut nodes = Vec::with_capacity(members.len());
        for member in members {
            let node = registry.to_doc_type_node(member, kind)?;
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        Ok(DocTypeNode::Union(nodes))
    }

    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let SemanticType::Union(members) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        let non_null: Vec<&SemanticType> = members
            .iter()
            .filter(|member| **member != SemanticType::Null)
            .collect();
        // `null` alone has no annotation form.
        if non_null.is_empty() {
            return Ok(None);
        }
        let has_null = non_null.len() < members.len();
        if let [single] = non_null.as_slice() {
            if has_null {
                return nullable_syntax(single, kind, registry);
            }
            return registry.to_syntax_type_node(single, kind);
        }
        union_syntax(&non_null, has_null, kind, registry)
    }
}

/// `?T` in docs; a compound `T` is written `T|null` instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullableTypeMapper;

impl TypeMapper for NullableTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Nullable
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::Nullable(inner) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        let null = DocTypeNode::identifier("null");
        match registry.to_doc_type_node(inner, kind)? {
            DocTypeNode::Union(mut members) => {
                members.push(null);
                Ok(DocTypeNode::Union(members))
            }
            intersection @ DocTypeNode::Intersection(_) => {
                Ok(DocTypeNode::Union(vec![intersection, null]))
            }
            node => Ok(DocTypeNode::Nullable(Box::new(node))),
        }
    }

    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let SemanticType::Nullable(inner) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        match &**inner {
            SemanticType::Union(members) => {
                let non_null: Vec<&SemanticType> = members
                    .iter()
                    .filter(|member| **member != SemanticType::Null)
                    .collect();
                union_syntax(&non_null, true, kind, registry)
            }
            inner => nullable_syntax(inner, kind, registry),
        }
    }
}

/// Intersections of class types only, from PHP 8.1.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntersectionTypeMapper;

impl TypeMapper for IntersectionTypeMapper {
    fn shape(&self) -> TypeShape {
        TypeShape::Intersection
    }

    fn to_doc_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<DocTypeNode, TypeMapperError> {
        let SemanticType::Intersection(members) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        let members = members
            .iter()
            .map(|member| registry.to_doc_type_node(member, kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocTypeNode::Intersection(members))
    }

    fn to_syntax_type_node(
        &self,
        ty: &SemanticType,
        kind: TypeKind,
        registry: &TypeMapperRegistry,
    ) -> Result<Option<TypeNode>, TypeMapperError> {
        let SemanticType::Intersection(members) = ty else {
            return Err(wrong_shape(ty, kind));
        };
        if !registry.supports(PhpVersionFeature::IntersectionTypes) {
            return Ok(None);
        }
        let mut nodes = Vec::with_capacity(members.len());
        for member in members {
            match registry.to_syntax_type_node(member, kind)? {
                Some(node @ TypeNode::Name(_)) => nodes.push(node),
                _ => return Ok(None),
            }
        }
        Ok(Some(TypeNode::Intersection(nodes)))
    }
}

/// `?T`, or `T|null` when `T` is itself compound.
fn nullable_syntax(
    inner: &SemanticType,
    kind: TypeKind,
    registry: &TypeMapperRegistry,
) -> Result<Option<TypeNode>, TypeMapperError> {
    match inner {
        // `mixed` already includes null.
        SemanticType::Mixed => return registry.to_syntax_type_node(inner, kind),
        SemanticType::Void | SemanticType::Never | SemanticType::Null => return Ok(None),
        _ => {}
    }
    if !registry.supports(PhpVersionFeature::NullableType) {
        return Ok(None);
    }
    let node = match registry.to_syntax_type_node(inner, kind)? {
        Some(node) => node,
        None => return Ok(None),
    };
    Ok(match node {
        TypeNode::Nullable(_) => Some(node),
        TypeNode::Union(mut members) => {
            members.push(TypeNode::identifier("null"));
            Some(TypeNode::Union(members))
        }
        TypeNode::Intersection(_) => {
            (registry.php_version() >= PhpVersion::PHP_82)
                .then(|| TypeNode::Union(vec![node, TypeNode::identifier("null")]))
        }
        node => Some(TypeNode::nullable(node)),
    })
}

/// `A|B` (plus `|null`); needs union types, and DNF types when a member is
/// an intersection.
fn union_syntax(
    members: &[&SemanticType],
    with_null: bool,
    kind: TypeKind,
    registry: &TypeMapperRegistry,
) -> Result<Option<TypeNode>, TypeMapperError> {
    if !registry.supports(PhpVersionFeature::UnionTypes) {
        return Ok(None);
    }
    let mut nodes: Vec<TypeNode> = Vec::with_capacity(members.len() + 1);
    for member in members {
        match member {
            SemanticType::Void | SemanticType::Never | SemanticType::Mixed => return Ok(None),
            SemanticType::Intersection(_) if registry.php_version() < PhpVersion::PHP_82 => {
                return Ok(None);
            }
            _ => {}
        }
        let node = match registry.to_syntax_type_node(member, kind)? {
            Some(node) => node,
            None => return Ok(None),
        };
        let flattened = match node {
            TypeNode::Union(inner) => inner,
            TypeNode::Nullable(inner) => vec![*inner, TypeNode::identifier("null")],
            node => vec![node],
        };
        for node in flattened {
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
    }
    if with_null {
        let null = TypeNode::identifier("null");
        if !nodes.contains(&null) {
            nodes.push(null);
        }
    }
    Ok(match nodes.len() {
        0 => None,
        1 => nodes.pop(),
        _ => Some(TypeNode::Union(nodes)),
    })
}
