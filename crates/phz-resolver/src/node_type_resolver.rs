//! Static types of expressions, as far as they can be read off the tree.
//!
//! This is not inference: the local resolver only looks at literals, `new`,
//! class references, declared parameter types and the last assignment to a
//! variable before its use. Everything else is `mixed`.

use phz_common::limits::MAX_TYPE_RESOLUTION_DEPTH;
use phz_mapper::{TypeContext, TypeMapperRegistry};
use phz_parser::{NameScope, NodeArena, NodeData, NodeIndex};
use phz_scanner::SyntaxKind;
use phz_types::SemanticType;
use std::sync::Arc;
use tracing::trace;

/// Type of the expression at `node`. `SemanticType::Mixed` when unknown.
pub trait NodeTypeResolver: Send + Sync {
    fn resolve(&self, arena: &NodeArena, node: NodeIndex) -> SemanticType;
}

#[derive(Clone, Debug)]
pub struct LocalNodeTypeResolver {
    type_mapper: Arc<TypeMapperRegistry>,
}

impl LocalNodeTypeResolver {
    pub fn new(type_mapper: Arc<TypeMapperRegistry>) -> LocalNodeTypeResolver {
        LocalNodeTypeResolver { type_mapper }
    }

    fn expression_type(&self, arena: &NodeArena, index: NodeIndex, depth: u32) -> SemanticType {
        if depth > MAX_TYPE_RESOLUTION_DEPTH {
            trace!(node = index.0, "type resolution depth limit reached");
            return SemanticType::Mixed;
        }
        let index = arena.skip_parentheses(index);
        let Some(node) = arena.get(index) else {
            return SemanticType::Mixed;
        };
        match &node.data {
            NodeData::Variable(data) => match data.name.as_deref() {
                Some("this") => this_type(arena, index),
                Some(name) => self.variable_type(arena, index, name, depth),
                None => SemanticType::Mixed,
            },
            NodeData::Name(_) => name_type(arena, index),
            NodeData::New(data) => match arena.get(data.class).map(|class| &class.data) {
                Some(NodeData::Name(_)) => match name_type(arena, data.class) {
                    SemanticType::SelfReference(class) | SemanticType::ParentReference(class) => {
                        SemanticType::Object(class)
                    }
                    other => other,
                },
                _ => SemanticType::ObjectWithoutClass,
            },
            NodeData::Literal(data) => match node.kind {
                SyntaxKind::StringLiteralExpression => SemanticType::String,
                _ => numeric_type(&data.value),
            },
            NodeData::ArrayLiteral(_) => SemanticType::mixed_array(),
            NodeData::Assign(data) => self.expression_type(arena, data.value, depth + 1),
            NodeData::Conditional(data) => {
                let when_true = if data.when_true.is_some() {
                    data.when_true
                } else {
                    data.condition
                };
                SemanticType::union([
                    self.expression_type(arena, when_true, depth + 1),
                    self.expression_type(arena, data.when_false, depth + 1),
                ])
            }
            NodeData::Binary(data) => match data.operator.as_str() {
                "instanceof" | "==" | "!=" | "<>" | "===" | "!==" | "<" | ">" | "<=" | ">="
                | "&&" | "||" | "and" | "or" | "xor" => SemanticType::Boolean,
                "." | ".=" => SemanticType::String,
                "<=>" => SemanticType::Integer,
                "??" => {
                    let left = self.expression_type(arena, data.left, depth + 1);
                    let right = self.expression_type(arena, data.right, depth + 1);
                    match left.without_null() {
                        Some(left) => SemanticType::union([left, right]),
                        None => right,
                    }
                }
                _ => SemanticType::Mixed,
            },
            NodeData::Unary(data) => match data.operator.as_str() {
                "!" => SemanticType::Boolean,
                "(int)" | "(integer)" | "print" => SemanticType::Integer,
                "(bool)" | "(boolean)" => SemanticType::Boolean,
                "(float)" | "(double)" => SemanticType::Float,
                "(string)" | "(binary)" => SemanticType::String,
                "(array)" => SemanticType::mixed_array(),
                "(object)" => SemanticType::ObjectWithoutClass,
                "clone" => self.expression_type(arena, data.operand, depth + 1),
                _ => SemanticType::Mixed,
            },
            _ => SemanticType::Mixed,
        }
    }

    /// Last assignment to `$name` that ends before `usage`, else the declared
    /// type of a parameter with that name.
    fn variable_type(
        &self,
        arena: &NodeArena,
        usage: NodeIndex,
        name: &str,
        depth: u32,
    ) -> SemanticType {
        let Some(usage_pos) = arena.get(usage).map(|node| node.pos) else {
            return SemanticType::Mixed;
        };
        let function = arena
            .get_metadata(usage)
            .map_or(NodeIndex::NONE, |metadata| metadata.function);
        let region = if function.is_some() {
            function
        } else {
            top_of(arena, usage)
        };

        let last_assignment = arena
            .descendants(region)
            .into_iter()
            .filter_map(|index| {
                let node = arena.get(index)?;
                let assign = arena.get_assign(node)?;
                let assigns_name = arena.variable_name(assign.target) == Some(name);
                (assigns_name && node.end <= usage_pos).then_some((node.pos, assign.value))
            })
            .max_by_key(|(pos, _)| *pos);
        if let Some((_, value)) = last_assignment {
            return self.expression_type(arena, value, depth + 1);
        }

        if function.is_some() {
            if let Some(ty) = self.parameter_type(arena, function, name) {
                return ty;
            }
        }
        SemanticType::Mixed
    }

    fn parameter_type(&self, arena: &NodeArena, function: NodeIndex, name: &str) -> Option<SemanticType> {
        let data = arena.get_function(arena.get(function)?)?;
        let parameter = data.parameters.iter().find_map(|index| {
            arena
                .get(index)
                .and_then(|node| arena.get_parameter(node))
                .filter(|parameter| parameter.name == name)
        })?;
        let annotation = parameter.type_annotation.as_ref()?;

        let empty = NameScope::default();
        let scope = arena.scope_of(function).unwrap_or(&empty);
        let metadata = arena.get_metadata(function);
        let context = TypeContext::new(scope).in_class(
            metadata.and_then(|metadata| metadata.class_name.as_deref()),
            metadata.and_then(|metadata| metadata.parent_class_name.as_deref()),
        );
        let ty = self.type_mapper.to_semantic_type(annotation, &context);
        Some(if parameter.variadic {
            SemanticType::array(SemanticType::Integer, ty)
        } else {
            ty
        })
    }
}

impl Default for LocalNodeTypeResolver {
    fn default() -> Self {
        LocalNodeTypeResolver::new(Arc::new(TypeMapperRegistry::with_default_mappers(
            Default::default(),
        )))
    }
}

impl NodeTypeResolver for LocalNodeTypeResolver {
    fn resolve(&self, arena: &NodeArena, node: NodeIndex) -> SemanticType {
        self.expression_type(arena, node, 0)
    }
}

fn this_type(arena: &NodeArena, index: NodeIndex) -> SemanticType {
    arena
        .get_metadata(index)
        .and_then(|metadata| metadata.class_name.as_deref())
        .map_or(SemanticType::Mixed, SemanticType::object)
}

/// A bare name in expression position: a class reference, or one of the
/// `true`/`false`/`null` constants.
fn name_type(arena: &NodeArena, index: NodeIndex) -> SemanticType {
    let Some(name) = arena.get(index).and_then(|node| arena.get_name(node)) else {
        return SemanticType::Mixed;
    };
    let metadata = arena.get_metadata(index);
    let class_name = metadata.and_then(|metadata| metadata.class_name.clone());
    match name.text.to_ascii_lowercase().as_str() {
        "true" | "false" => SemanticType::Boolean,
        "null" => SemanticType::Null,
        "self" => class_name.map_or(SemanticType::Mixed, SemanticType::SelfReference),
        "static" => class_name.map_or(SemanticType::Mixed, SemanticType::StaticReference),
        "parent" => metadata
            .and_then(|metadata| metadata.parent_class_name.clone())
            .map_or(SemanticType::Mixed, SemanticType::ParentReference),
        _ => arena
            .resolved_name(index)
            .map_or(SemanticType::Mixed, SemanticType::object),
    }
}

fn numeric_type(literal: &str) -> SemanticType {
    let lower = literal.to_ascii_lowercase();
    let is_float = !lower.starts_with("0x") && (lower.contains('.') || lower.contains('e'));
    if is_float {
        SemanticType::Float
    } else {
        SemanticType::Integer
    }
}

fn top_of(arena: &NodeArena, mut index: NodeIndex) -> NodeIndex {
    while let Some(parent) = arena.get(index).map(|node| node.parent) {
        if parent.is_none() {
            break;
        }
        index = parent;
    }
    index
}
