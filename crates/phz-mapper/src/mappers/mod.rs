//! Built-in mappers, one per semantic type shape.

mod compound;
mod object;
mod scalar;

pub use compound::{IntersectionTypeMapper, NullableTypeMapper, UnionTypeMapper};
pub use object::{
    GenericObjectTypeMapper, ObjectTypeMapper, ParentReferenceTypeMapper, SelfReferenceTypeMapper,
    StaticReferenceTypeMapper,
};
pub use scalar::{
    ArrayTypeMapper, BooleanTypeMapper, CallableTypeMapper, ClassStringTypeMapper,
    FloatTypeMapper, IntegerTypeMapper, IterableTypeMapper, MixedTypeMapper, NeverTypeMapper,
    NullTypeMapper, ObjectWithoutClassTypeMapper, ResourceTypeMapper, StringTypeMapper,
    VoidTypeMapper,
};

use crate::error::TypeMapperError;
use crate::type_kind::TypeKind;
use phz_types::SemanticType;

/// Error for a mapper handed a type it does not accept.
fn wrong_shape(ty: &SemanticType, kind: TypeKind) -> TypeMapperError {
    TypeMapperError::UnsupportedTypeShape {
        shape: ty.shape(),
        kind,
    }
}
