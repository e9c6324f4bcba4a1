//! Scope decoration.
//!
//! After parsing, every node gets the namespace/import scope it appears in,
//! its enclosing class-like and function, and (for declarations and name
//! references) a fully-qualified name. The enclosing class-like and function
//! of a declaration node is the node itself.

use crate::base::NodeIndex;
use crate::node::{NameData, NameScope, NodeData, NodeMetadata, ScopeId, UseKind};
use crate::node_arena::NodeArena;
use crate::syntax_store::SourceUnit;
use phz_scanner::SyntaxKind;

/// Attaches metadata needed by later resolution steps. Implementations must
/// be idempotent: decorating twice gives the same unit as decorating once.
pub trait Decorator: Send + Sync {
    fn decorate(&self, unit: SourceUnit) -> SourceUnit;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScopeDecorator;

impl ScopeDecorator {
    pub fn new() -> ScopeDecorator {
        ScopeDecorator
    }
}

impl Decorator for ScopeDecorator {
    fn decorate(&self, mut unit: SourceUnit) -> SourceUnit {
        decorate_arena(&mut unit.arena, unit.root);
        unit
    }
}

#[derive(Clone, Default)]
struct Context {
    scope_id: ScopeId,
    scope: NameScope,
    class_like: NodeIndex,
    function: NodeIndex,
    class_name: Option<String>,
    parent_class_name: Option<String>,
}

/// Rebuild all scope metadata under `root`. Previous decoration is discarded.
pub fn decorate_arena(arena: &mut NodeArena, root: NodeIndex) {
    arena.scopes.clear();
    for metadata in arena.metadata.iter_mut() {
        *metadata = NodeMetadata::default();
    }
    let context = enter_region(arena, root, &Context::default(), None);
    visit(arena, root, &context);
}

/// A file or namespace body starts a new scope made of the namespace and
/// every import statement directly inside it.
fn enter_region(
    arena: &mut NodeArena,
    region: NodeIndex,
    outer: &Context,
    namespace: Option<String>,
) -> Context {
    let statements: Vec<NodeIndex> = match arena.get(region).map(|node| &node.data) {
        Some(NodeData::SourceFile(data)) => data.statements.iter().collect(),
        Some(NodeData::Namespace(data)) => data.statements.iter().collect(),
        _ => Vec::new(),
    };

    let mut scope = NameScope {
        namespace,
        ..NameScope::default()
    };
    for statement in statements {
        let Some(NodeData::Use(data)) = arena.get(statement).map(|node| &node.data) else {
            continue;
        };
        for item in &data.items {
            let key = item.visible_name().to_ascii_lowercase();
            match data.kind {
                UseKind::Class => {
                    scope.class_imports.insert(key, item.name.clone());
                }
                UseKind::Function => {
                    scope.function_imports.insert(key, item.name.clone());
                }
                UseKind::Constant => {}
            }
        }
    }

    let scope_id = arena.add_scope(scope.clone());
    Context {
        scope_id,
        scope,
        ..outer.clone()
    }
}

fn visit(arena: &mut NodeArena, index: NodeIndex, context: &Context) {
    let Some(node) = arena.get(index) else {
        return;
    };
    let kind = node.kind;

    let mut inner: Option<Context> = None;
    let mut resolved_name = None;
    let mut namespace_region = None;
    match &node.data {
        NodeData::Namespace(data) => namespace_region = Some(data.name.clone()),
        NodeData::ClassLike(data) => {
            let class_name = arena
                .identifier_text(data.name)
                .map(|short| context.scope.qualify(short));
            let parent_class_name = if kind == SyntaxKind::ClassDeclaration {
                data.extends
                    .iter()
                    .next()
                    .and_then(|parent| arena.get(parent))
                    .and_then(|parent| arena.get_name(parent))
                    .map(|name| context.scope.resolve_class_name(name))
            } else {
                None
            };
            resolved_name = class_name.clone();
            inner = Some(Context {
                class_like: index,
                function: NodeIndex::NONE,
                class_name,
                parent_class_name,
                ..context.clone()
            });
        }
        NodeData::Function(data) => {
            if kind == SyntaxKind::FunctionDeclaration {
                resolved_name = arena
                    .identifier_text(data.name)
                    .map(|short| context.scope.qualify(short));
            }
            inner = Some(Context {
                function: index,
                ..context.clone()
            });
        }
        NodeData::Name(name) => {
            resolved_name = resolve_name_reference(arena, index, node.parent, name, context);
        }
        _ => {}
    }
    if let Some(namespace) = namespace_region {
        inner = Some(enter_region(arena, index, context, namespace));
    }

    let context = inner.as_ref().unwrap_or(context);
    if let Some(metadata) = arena.get_metadata_mut(index) {
        metadata.scope = context.scope_id;
        metadata.class_like = context.class_like;
        metadata.function = context.function;
        metadata.class_name = context.class_name.clone();
        metadata.parent_class_name = context.parent_class_name.clone();
        metadata.resolved_name = resolved_name;
    }

    for child in arena.children(index) {
        visit(arena, child, context);
    }
}

/// Fully-qualified target of a name reference, or `None` for bare constants.
fn resolve_name_reference(
    arena: &NodeArena,
    index: NodeIndex,
    parent: NodeIndex,
    name: &NameData,
    context: &Context,
) -> Option<String> {
    let parent_node = arena.get(parent)?;
    let is_class_position = match &parent_node.data {
        NodeData::Call(call) if parent_node.kind == SyntaxKind::FunctionCall => {
            if call.target == index {
                return Some(context.scope.resolve_function_name(name));
            }
            false
        }
        NodeData::Call(call) => call.target == index,
        NodeData::Access(access) => {
            parent_node.kind != SyntaxKind::ElementAccessExpression && access.target == index
        }
        NodeData::New(new) => new.class == index,
        NodeData::Binary(binary) => binary.operator == "instanceof" && binary.right == index,
        NodeData::ClassLike(_) | NodeData::TraitUse(_) => true,
        _ => false,
    };
    if !is_class_position {
        return None;
    }

    if name.is_special_class_name() {
        return if name.text.eq_ignore_ascii_case("parent") {
            context.parent_class_name.clone()
        } else {
            context.class_name.clone()
        };
    }
    Some(context.scope.resolve_class_name(name))
}
