use crate::type_kind::TypeKind;
use phz_types::TypeShape;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeMapperError {
    /// No registered mapper accepts the shape. The registry is missing a
    /// mapper for a shape the type model can produce.
    #[error("no type mapper accepts shape '{shape}' (in {kind} position)")]
    UnsupportedTypeShape { shape: TypeShape, kind: TypeKind },
}
