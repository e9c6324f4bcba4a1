//! Annotation syntax back to semantic types.
//!
//! The annotation grammar is closed, so this is a plain match instead of a
//! mapper lookup.

use phz_parser::{NameScope, TypeNode};
use phz_types::SemanticType;

/// What an annotation needs from its surroundings to be understood.
#[derive(Clone, Copy, Debug)]
pub struct TypeContext<'a> {
    /// Namespace and imports for class names.
    pub scope: &'a NameScope,
    /// Enclosing class, for `self` and `static`.
    pub class_name: Option<&'a str>,
    /// Its parent, for `parent`.
    pub parent_class_name: Option<&'a str>,
}

impl<'a> TypeContext<'a> {
    pub fn new(scope: &'a NameScope) -> TypeContext<'a> {
        TypeContext {
            scope,
            class_name: None,
            parent_class_name: None,
        }
    }

    pub fn in_class(mut self, class_name: Option<&'a str>, parent: Option<&'a str>) -> TypeContext<'a> {
        self.class_name = class_name;
        self.parent_class_name = parent;
        self
    }
}

pub fn semantic_type_from_node(node: &TypeNode, context: &TypeContext<'_>) -> SemanticType {
    match node {
        TypeNode::Identifier(keyword) => keyword_type(keyword, context),
        TypeNode::Name(name) => {
            if name.is_special_class_name() {
                return keyword_type(&name.text.to_ascii_lowercase(), context);
            }
            SemanticType::object(&context.scope.resolve_class_name(name))
        }
        TypeNode::Nullable(inner) => SemanticType::nullable(semantic_type_from_node(inner, context)),
        TypeNode::Union(members) => SemanticType::union(
            members
                .iter()
                .map(|member| semantic_type_from_node(member, context)),
        ),
        TypeNode::Intersection(members) => SemanticType::Intersection(
            members
                .iter()
                .map(|member| semantic_type_from_node(member, context))
                .collect(),
        ),
    }
}

fn keyword_type(keyword: &str, context: &TypeContext<'_>) -> SemanticType {
    match keyword {
        "int" => SemanticType::Integer,
        "float" => SemanticType::Float,
        "string" => SemanticType::String,
        "bool" | "false" | "true" => SemanticType::Boolean,
        "array" => SemanticType::mixed_array(),
        "iterable" => SemanticType::Iterable(Box::new(SemanticType::Mixed)),
        "callable" => SemanticType::Callable,
        "object" => SemanticType::ObjectWithoutClass,
        "void" => SemanticType::Void,
        "never" => SemanticType::Never,
        "null" => SemanticType::Null,
        "self" => context
            .class_name
            .map_or(SemanticType::Mixed, |class| SemanticType::SelfReference(class.to_string())),
        "static" => context
            .class_name
            .map_or(SemanticType::Mixed, |class| SemanticType::StaticReference(class.to_string())),
        "parent" => context
            .parent_class_name
            .map_or(SemanticType::Mixed, |class| SemanticType::ParentReference(class.to_string())),
        _ => SemanticType::Mixed,
    }
}
