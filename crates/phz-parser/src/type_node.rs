//! Owned type-annotation nodes.
//!
//! Type annotations are small and get copied between arenas and into the
//! type mapper, so they are stored by value instead of as arena nodes.

use crate::node::{NameData, NameKind};
use serde::Serialize;
use std::fmt;

/// Built-in type keywords accepted in annotations (lower-case).
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "parent", "self", "static", "string", "true", "void",
];

pub fn is_builtin_type_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BUILTIN_TYPE_NAMES.contains(&lower.as_str())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeNode {
    /// Built-in keyword such as `int`, `self` or `void`, stored lower-case.
    Identifier(String),
    /// Class reference.
    Name(NameData),
    Nullable(Box<TypeNode>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
}

impl TypeNode {
    pub fn identifier(name: &str) -> TypeNode {
        TypeNode::Identifier(name.to_ascii_lowercase())
    }

    /// Fully-qualified class reference.
    pub fn fully_qualified(name: &str) -> TypeNode {
        TypeNode::Name(NameData {
            text: name.trim_start_matches('\\').to_string(),
            kind: NameKind::FullyQualified,
        })
    }

    pub fn nullable(inner: TypeNode) -> TypeNode {
        TypeNode::Nullable(Box::new(inner))
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Identifier(name) => f.write_str(name),
            TypeNode::Name(name) => {
                if name.kind == NameKind::FullyQualified {
                    f.write_str("\\")?;
                }
                f.write_str(&name.text)
            }
            TypeNode::Nullable(inner) => write!(f, "?{inner}"),
            TypeNode::Union(types) => write_joined(f, types, "|", true),
            TypeNode::Intersection(types) => write_joined(f, types, "&", false),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    types: &[TypeNode],
    separator: &str,
    group_intersections: bool,
) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if group_intersections && matches!(ty, TypeNode::Intersection(_)) {
            write!(f, "({ty})")?;
        } else {
            write!(f, "{ty}")?;
        }
    }
    Ok(())
}
