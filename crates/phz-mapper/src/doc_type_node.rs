//! Doc-comment type nodes.
//!
//! These are the types written in `@param`, `@return` and `@var` tags. They
//! can express more than annotations can (generics, `T[]`, `class-string`),
//! so every semantic type has a doc form even when it has no annotation form.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DocTypeNode {
    /// Keyword or class name as printed, e.g. `int`, `self`, `\App\User`.
    Identifier(String),
    /// `T[]`
    Array(Box<DocTypeNode>),
    /// `name<args>`, e.g. `array<string, int>` or `\Collection<\User>`.
    Generic {
        name: String,
        args: Vec<DocTypeNode>,
    },
    Nullable(Box<DocTypeNode>),
    Union(Vec<DocTypeNode>),
    Intersection(Vec<DocTypeNode>),
}

impl DocTypeNode {
    pub fn identifier(name: impl Into<String>) -> DocTypeNode {
        DocTypeNode::Identifier(name.into())
    }

    /// Class reference printed fully qualified.
    pub fn class(name: &str) -> DocTypeNode {
        DocTypeNode::Identifier(format!("\\{}", name.trim_start_matches('\\')))
    }

    pub fn generic(name: impl Into<String>, args: Vec<DocTypeNode>) -> DocTypeNode {
        DocTypeNode::Generic {
            name: name.into(),
            args,
        }
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            DocTypeNode::Union(_) | DocTypeNode::Intersection(_) | DocTypeNode::Nullable(_)
        )
    }
}

impl fmt::Display for DocTypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocTypeNode::Identifier(name) => f.write_str(name),
            DocTypeNode::Array(item) => {
                if item.is_compound() {
                    write!(f, "({item})[]")
                } else {
                    write!(f, "{item}[]")
                }
            }
            DocTypeNode::Generic { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            DocTypeNode::Nullable(inner) => write!(f, "?{inner}"),
            DocTypeNode::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    match ty {
                        DocTypeNode::Intersection(_) => write!(f, "({ty})")?,
                        _ => write!(f, "{ty}")?,
                    }
                }
                Ok(())
            }
            DocTypeNode::Intersection(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("&")?;
                    }
                    if ty.is_compound() {
                        write!(f, "({ty})")?;
                    } else {
                        write!(f, "{ty}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
