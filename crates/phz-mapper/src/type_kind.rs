//! Positions a type can be printed in.

use serde::Serialize;
use std::fmt;

/// Where a mapped type will appear. Some annotation forms are only legal in
/// some positions (`void` only as a return type, `callable` never on a
/// property).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Property,
    Param,
    Return,
    /// No position restriction, e.g. for doc comments on `@var` tags.
    Any,
}

impl TypeKind {
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Property => "property",
            TypeKind::Param => "param",
            TypeKind::Return => "return",
            TypeKind::Any => "any",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
