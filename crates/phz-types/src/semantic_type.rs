//! Semantic types as seen by the analysis layer.
//!
//! These are independent of syntax: a `SemanticType` says what a value is,
//! not how it would be written. `TypeShape` is the dispatch tag used by the
//! type mappers; shapes form a small hierarchy (see `TypeShape::parent`).

use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SemanticType {
    Mixed,
    Void,
    Never,
    Null,
    Boolean,
    Integer,
    Float,
    String,
    /// `class-string`, optionally bound to a class.
    ClassString(Option<String>),
    Callable,
    Iterable(Box<SemanticType>),
    Array {
        key: Box<SemanticType>,
        item: Box<SemanticType>,
    },
    Resource,
    /// `object` without a known class.
    ObjectWithoutClass,
    Object(String),
    /// `self` inside the named class.
    SelfReference(String),
    /// Late static binding inside the named class.
    StaticReference(String),
    /// `parent` of the enclosing class; carries the parent's name.
    ParentReference(String),
    /// A class instantiated with type arguments, e.g. a collection of T.
    GenericObject {
        class: String,
        args: Vec<SemanticType>,
    },
    Union(Vec<SemanticType>),
    Nullable(Box<SemanticType>),
    Intersection(Vec<SemanticType>),
}

/// Dispatch tag of a `SemanticType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TypeShape {
    Mixed,
    Void,
    Never,
    Null,
    Boolean,
    Integer,
    Float,
    String,
    ClassString,
    Callable,
    Iterable,
    Array,
    Resource,
    ObjectWithoutClass,
    Object,
    SelfReference,
    StaticReference,
    ParentReference,
    GenericObject,
    Union,
    Nullable,
    Intersection,
}

impl TypeShape {
    /// Immediate super-shape, if any.
    pub fn parent(self) -> Option<TypeShape> {
        match self {
            TypeShape::SelfReference
            | TypeShape::StaticReference
            | TypeShape::ParentReference
            | TypeShape::GenericObject => Some(TypeShape::Object),
            TypeShape::ClassString => Some(TypeShape::String),
            _ => None,
        }
    }

    /// `self` equals `other` or is one of its sub-shapes.
    pub fn is_a(self, other: TypeShape) -> bool {
        let mut current = Some(self);
        while let Some(shape) = current {
            if shape == other {
                return true;
            }
            current = shape.parent();
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeShape::Mixed => "mixed",
            TypeShape::Void => "void",
            TypeShape::Never => "never",
            TypeShape::Null => "null",
            TypeShape::Boolean => "boolean",
            TypeShape::Integer => "integer",
            TypeShape::Float => "float",
            TypeShape::String => "string",
            TypeShape::ClassString => "class-string",
            TypeShape::Callable => "callable",
            TypeShape::Iterable => "iterable",
            TypeShape::Array => "array",
            TypeShape::Resource => "resource",
            TypeShape::ObjectWithoutClass => "object-without-class",
            TypeShape::Object => "object",
            TypeShape::SelfReference => "self-reference",
            TypeShape::StaticReference => "static-reference",
            TypeShape::ParentReference => "parent-reference",
            TypeShape::GenericObject => "generic-object",
            TypeShape::Union => "union",
            TypeShape::Nullable => "nullable",
            TypeShape::Intersection => "intersection",
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SemanticType {
    pub fn shape(&self) -> TypeShape {
        match self {
            SemanticType::Mixed => TypeShape::Mixed,
            SemanticType::Void => TypeShape::Void,
            SemanticType::Never => TypeShape::Never,
            SemanticType::Null => TypeShape::Null,
            SemanticType::Boolean => TypeShape::Boolean,
            SemanticType::Integer => TypeShape::Integer,
            SemanticType::Float => TypeShape::Float,
            SemanticType::String => TypeShape::String,
            SemanticType::ClassString(_) => TypeShape::ClassString,
            SemanticType::Callable => TypeShape::Callable,
            SemanticType::Iterable(_) => TypeShape::Iterable,
            SemanticType::Array { .. } => TypeShape::Array,
            SemanticType::Resource => TypeShape::Resource,
            SemanticType::ObjectWithoutClass => TypeShape::ObjectWithoutClass,
            SemanticType::Object(_) => TypeShape::Object,
            SemanticType::SelfReference(_) => TypeShape::SelfReference,
            SemanticType::StaticReference(_) => TypeShape::StaticReference,
            SemanticType::ParentReference(_) => TypeShape::ParentReference,
            SemanticType::GenericObject { .. } => TypeShape::GenericObject,
            SemanticType::Union(_) => TypeShape::Union,
            SemanticType::Nullable(_) => TypeShape::Nullable,
            SemanticType::Intersection(_) => TypeShape::Intersection,
        }
    }

    /// Object of the given class; a leading backslash is dropped.
    pub fn object(class: &str) -> SemanticType {
        SemanticType::Object(class.trim_start_matches('\\').to_string())
    }

    pub fn nullable(inner: SemanticType) -> SemanticType {
        match inner {
            SemanticType::Nullable(_) | SemanticType::Null | SemanticType::Mixed => inner,
            other => SemanticType::Nullable(Box::new(other)),
        }
    }

    /// `array<key, item>`.
    pub fn array(key: SemanticType, item: SemanticType) -> SemanticType {
        SemanticType::Array {
            key: Box::new(key),
            item: Box::new(item),
        }
    }

    /// `array` with unknown keys and items.
    pub fn mixed_array() -> SemanticType {
        SemanticType::array(SemanticType::Mixed, SemanticType::Mixed)
    }

    /// Build a union, flattening nested unions and dropping duplicates.
    /// A single remaining member is returned as is.
    pub fn union(types: impl IntoIterator<Item = SemanticType>) -> SemanticType {
        let mut members: Vec<SemanticType> = Vec::new();
        for ty in types {
            let flattened = match ty {
                SemanticType::Union(inner) => inner,
                SemanticType::Nullable(inner) => vec![*inner, SemanticType::Null],
                other => vec![other],
            };
            for member in flattened {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
        }
        match members.len() {
            0 => SemanticType::Never,
            1 => members.pop().unwrap_or(SemanticType::Never),
            _ => SemanticType::Union(members),
        }
    }

    /// Class carried by object-like types.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            SemanticType::Object(class)
            | SemanticType::SelfReference(class)
            | SemanticType::StaticReference(class)
            | SemanticType::ParentReference(class)
            | SemanticType::GenericObject { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            SemanticType::Null | SemanticType::Nullable(_) | SemanticType::Mixed => true,
            SemanticType::Union(members) => members.iter().any(SemanticType::is_nullable),
            _ => false,
        }
    }

    /// The type with `null` removed. Returns `None` for a bare `null`.
    pub fn without_null(&self) -> Option<SemanticType> {
        match self {
            SemanticType::Null => None,
            SemanticType::Nullable(inner) => Some((**inner).clone()),
            SemanticType::Union(members) => {
                let rest: Vec<SemanticType> = members
                    .iter()
                    .filter(|member| **member != SemanticType::Null)
                    .cloned()
                    .collect();
                if rest.is_empty() {
                    None
                } else {
                    Some(SemanticType::union(rest))
                }
            }
            other => Some(other.clone()),
        }
    }
}
