//! Node storage types.
//!
//! Every node lives in a `NodeArena` and refers to its children by
//! `NodeIndex`. Kind-specific payloads are stored inline in `NodeData`.

use crate::base::{NodeIndex, NodeList};
use crate::type_node::TypeNode;
use bitflags::bitflags;
use phz_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32, data: NodeData) -> Node {
        Node {
            kind,
            pos,
            end,
            parent: NodeIndex::NONE,
            data,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ModifierFlags: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const ABSTRACT = 1 << 4;
        const FINAL = 1 << 5;
        const READONLY = 1 << 6;
        const VISIBILITY = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

impl ModifierFlags {
    pub fn from_keyword(kind: SyntaxKind) -> ModifierFlags {
        match kind {
            SyntaxKind::PublicKeyword | SyntaxKind::VarKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::FinalKeyword => ModifierFlags::FINAL,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            _ => ModifierFlags::empty(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NameKind {
    /// `Foo`
    Unqualified,
    /// `Foo\Bar`
    Qualified,
    /// `\Foo\Bar`
    FullyQualified,
}

/// A name as written in source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NameData {
    /// Text without the leading backslash.
    pub text: String,
    pub kind: NameKind,
}

impl NameData {
    pub fn new(raw: &str) -> NameData {
        if let Some(stripped) = raw.strip_prefix('\\') {
            NameData {
                text: stripped.to_string(),
                kind: NameKind::FullyQualified,
            }
        } else if raw.contains('\\') {
            NameData {
                text: raw.to_string(),
                kind: NameKind::Qualified,
            }
        } else {
            NameData {
                text: raw.to_string(),
                kind: NameKind::Unqualified,
            }
        }
    }

    /// `self`, `static` and `parent` refer to the enclosing class hierarchy.
    pub fn is_special_class_name(&self) -> bool {
        self.kind == NameKind::Unqualified
            && matches!(
                self.text.to_ascii_lowercase().as_str(),
                "self" | "static" | "parent"
            )
    }

    /// Last segment of the name.
    pub fn short_name(&self) -> &str {
        self.text.rsplit('\\').next().unwrap_or(&self.text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceFileData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamespaceData {
    /// `None` for the global namespace block `namespace { ... }`.
    pub name: Option<String>,
    pub statements: NodeList,
    pub braced: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UseKind {
    Class,
    Function,
    Constant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UseItem {
    /// Imported fully-qualified name, without leading backslash.
    pub name: String,
    pub alias: Option<String>,
}

impl UseItem {
    /// Name the import is visible under.
    pub fn visible_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.name.rsplit('\\').next().unwrap_or(&self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UseData {
    pub kind: UseKind,
    pub items: Vec<UseItem>,
}

/// Payload shared by classes, interfaces and traits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassLikeData {
    pub name: NodeIndex,
    pub modifiers: ModifierFlags,
    /// Single parent for classes, any number for interfaces.
    pub extends: NodeList,
    pub implements: NodeList,
    pub members: NodeList,
    pub doc_comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraitUseData {
    pub traits: NodeList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassConstantData {
    pub name: String,
    pub modifiers: ModifierFlags,
    pub value: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyData {
    /// Name without `$`.
    pub name: String,
    pub modifiers: ModifierFlags,
    pub type_annotation: Option<TypeNode>,
    pub default: NodeIndex,
    pub doc_comment: Option<String>,
}

/// Payload shared by functions and methods.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub modifiers: ModifierFlags,
    pub by_ref: bool,
    pub parameters: NodeList,
    pub return_type: Option<TypeNode>,
    /// `NONE` for abstract and interface methods.
    pub body: NodeIndex,
    pub doc_comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterData {
    /// Name without `$`.
    pub name: String,
    pub type_annotation: Option<TypeNode>,
    pub default: NodeIndex,
    pub by_ref: bool,
    pub variadic: bool,
    /// Constructor property promotion modifiers.
    pub promoted: ModifierFlags,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IfStatementData {
    pub condition: NodeIndex,
    pub then_statement: NodeIndex,
    /// `elseif` chains are nested `IfStatement` nodes here.
    pub else_statement: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssignData {
    pub target: NodeIndex,
    pub value: NodeIndex,
    pub by_ref: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator: String,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnaryExprData {
    pub operator: String,
    pub operand: NodeIndex,
    /// `false` for postfix `++`/`--`.
    pub prefix: bool,
}

/// `a ? b : c`; `when_true` is `NONE` for the short form `a ?: c`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// Method, static and function calls.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallData {
    /// Receiver (method call), class reference (static call) or callee (function call).
    pub target: NodeIndex,
    /// `Identifier` for a plain method name, any expression for a dynamic one,
    /// `NONE` for function calls.
    pub name: NodeIndex,
    pub arguments: NodeList,
    pub nullsafe: bool,
}

/// Property, class-constant and element fetches.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccessData {
    pub target: NodeIndex,
    pub name: NodeIndex,
    pub nullsafe: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewData {
    pub class: NodeIndex,
    pub arguments: NodeList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArrayLiteralData {
    /// Same length as `values`; `NONE` where no key was written.
    pub keys: Vec<NodeIndex>,
    pub values: NodeList,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariableData {
    /// `None` for variable variables (`$$a`, `${expr}`).
    pub name: Option<String>,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdentifierData {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LiteralData {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeData {
    None,
    SourceFile(SourceFileData),
    Namespace(NamespaceData),
    Use(UseData),
    ClassLike(ClassLikeData),
    TraitUse(TraitUseData),
    ClassConstant(ClassConstantData),
    Property(PropertyData),
    Function(FunctionData),
    Parameter(ParameterData),
    Block(BlockData),
    Return(ReturnData),
    ExpressionStatement(ExprStatementData),
    If(IfStatementData),
    Assign(AssignData),
    Binary(BinaryExprData),
    Unary(UnaryExprData),
    Conditional(ConditionalExprData),
    Call(CallData),
    Access(AccessData),
    New(NewData),
    ArrayLiteral(ArrayLiteralData),
    Parenthesized(ParenthesizedData),
    Variable(VariableData),
    Name(NameData),
    Identifier(IdentifierData),
    Literal(LiteralData),
}

impl NodeData {
    /// Push child indices in source order.
    pub fn collect_children(&self, out: &mut SmallVec<[NodeIndex; 8]>) {
        let mut push = |index: NodeIndex| {
            if index.is_some() {
                out.push(index);
            }
        };
        match self {
            NodeData::None
            | NodeData::Use(_)
            | NodeData::Name(_)
            | NodeData::Identifier(_)
            | NodeData::Literal(_) => {}
            NodeData::SourceFile(data) => data.statements.iter().for_each(push),
            NodeData::Namespace(data) => data.statements.iter().for_each(push),
            NodeData::ClassLike(data) => {
                push(data.name);
                data.extends.iter().for_each(&mut push);
                data.implements.iter().for_each(&mut push);
                data.members.iter().for_each(push);
            }
            NodeData::TraitUse(data) => data.traits.iter().for_each(push),
            NodeData::ClassConstant(data) => push(data.value),
            NodeData::Property(data) => push(data.default),
            NodeData::Function(data) => {
                push(data.name);
                data.parameters.iter().for_each(&mut push);
                push(data.body);
            }
            NodeData::Parameter(data) => push(data.default),
            NodeData::Block(data) => data.statements.iter().for_each(push),
            NodeData::Return(data) => push(data.expression),
            NodeData::ExpressionStatement(data) => push(data.expression),
            NodeData::If(data) => {
                push(data.condition);
                push(data.then_statement);
                push(data.else_statement);
            }
            NodeData::Assign(data) => {
                push(data.target);
                push(data.value);
            }
            NodeData::Binary(data) => {
                push(data.left);
                push(data.right);
            }
            NodeData::Unary(data) => push(data.operand),
            NodeData::Conditional(data) => {
                push(data.condition);
                push(data.when_true);
                push(data.when_false);
            }
            NodeData::Call(data) => {
                push(data.target);
                push(data.name);
                data.arguments.iter().for_each(push);
            }
            NodeData::Access(data) => {
                push(data.target);
                push(data.name);
            }
            NodeData::New(data) => {
                push(data.class);
                data.arguments.iter().for_each(push);
            }
            NodeData::ArrayLiteral(data) => {
                for (key, value) in data.keys.iter().zip(data.values.iter()) {
                    push(*key);
                    push(value);
                }
            }
            NodeData::Parenthesized(data) => push(data.expression),
            NodeData::Variable(data) => push(data.expression),
        }
    }

    /// Rewrite every child index through `remap`. Used when copying subtrees
    /// between arenas.
    pub fn remap_children(&mut self, remap: &mut impl FnMut(NodeIndex) -> NodeIndex) {
        let map_list = |list: &mut NodeList, remap: &mut dyn FnMut(NodeIndex) -> NodeIndex| {
            for index in list.nodes.iter_mut() {
                *index = remap(*index);
            }
        };
        match self {
            NodeData::None
            | NodeData::Use(_)
            | NodeData::Name(_)
            | NodeData::Identifier(_)
            | NodeData::Literal(_) => {}
            NodeData::SourceFile(data) => map_list(&mut data.statements, remap),
            NodeData::Namespace(data) => map_list(&mut data.statements, remap),
            NodeData::ClassLike(data) => {
                data.name = remap(data.name);
                map_list(&mut data.extends, remap);
                map_list(&mut data.implements, remap);
                map_list(&mut data.members, remap);
            }
            NodeData::TraitUse(data) => map_list(&mut data.traits, remap),
            NodeData::ClassConstant(data) => data.value = remap(data.value),
            NodeData::Property(data) => data.default = remap(data.default),
            NodeData::Function(data) => {
                data.name = remap(data.name);
                map_list(&mut data.parameters, remap);
                data.body = remap(data.body);
            }
            NodeData::Parameter(data) => data.default = remap(data.default),
            NodeData::Block(data) => map_list(&mut data.statements, remap),
            NodeData::Return(data) => data.expression = remap(data.expression),
            NodeData::ExpressionStatement(data) => data.expression = remap(data.expression),
            NodeData::If(data) => {
                data.condition = remap(data.condition);
                data.then_statement = remap(data.then_statement);
                data.else_statement = remap(data.else_statement);
            }
            NodeData::Assign(data) => {
                data.target = remap(data.target);
                data.value = remap(data.value);
            }
            NodeData::Binary(data) => {
                data.left = remap(data.left);
                data.right = remap(data.right);
            }
            NodeData::Unary(data) => data.operand = remap(data.operand),
            NodeData::Conditional(data) => {
                data.condition = remap(data.condition);
                data.when_true = remap(data.when_true);
                data.when_false = remap(data.when_false);
            }
            NodeData::Call(data) => {
                data.target = remap(data.target);
                data.name = remap(data.name);
                map_list(&mut data.arguments, remap);
            }
            NodeData::Access(data) => {
                data.target = remap(data.target);
                data.name = remap(data.name);
            }
            NodeData::New(data) => {
                data.class = remap(data.class);
                map_list(&mut data.arguments, remap);
            }
            NodeData::ArrayLiteral(data) => {
                for key in data.keys.iter_mut() {
                    *key = remap(*key);
                }
                map_list(&mut data.values, remap);
            }
            NodeData::Parenthesized(data) => data.expression = remap(data.expression),
            NodeData::Variable(data) => data.expression = remap(data.expression),
        }
    }
}

/// Identifier of a `NameScope` inside an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);
}

impl Default for ScopeId {
    fn default() -> Self {
        ScopeId::NONE
    }
}

/// Namespace and imports in effect for a region of a file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NameScope {
    pub namespace: Option<String>,
    /// Lower-cased visible name -> imported fully-qualified class name.
    pub class_imports: FxHashMap<String, String>,
    /// Lower-cased visible name -> imported fully-qualified function name.
    pub function_imports: FxHashMap<String, String>,
}

/// Metadata attached by the scope decorator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeMetadata {
    pub scope: ScopeId,
    /// Enclosing class-like declaration, if it is part of the same arena.
    pub class_like: NodeIndex,
    /// Enclosing function or method, if it is part of the same arena.
    pub function: NodeIndex,
    /// Fully-qualified name of the enclosing class-like declaration.
    pub class_name: Option<String>,
    /// Fully-qualified name of the enclosing class's parent.
    pub parent_class_name: Option<String>,
    /// Fully-qualified name of a declaration, or the resolved target of a name reference.
    pub resolved_name: Option<String>,
}

impl NameScope {
    /// Prefix `name` with the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}\\{name}"),
            None => name.to_string(),
        }
    }

    /// Resolve a class reference to its fully-qualified name (no leading
    /// backslash). `self`, `static` and `parent` are returned unchanged;
    /// they depend on the enclosing class, not on the scope.
    pub fn resolve_class_name(&self, name: &NameData) -> String {
        match name.kind {
            NameKind::FullyQualified => name.text.clone(),
            NameKind::Qualified => {
                let (first, rest) = name.text.split_once('\\').unwrap_or((&name.text, ""));
                match self.class_imports.get(&first.to_ascii_lowercase()) {
                    Some(imported) => format!("{imported}\\{rest}"),
                    None => self.qualify(&name.text),
                }
            }
            NameKind::Unqualified => {
                if name.is_special_class_name() {
                    return name.text.clone();
                }
                match self.class_imports.get(&name.text.to_ascii_lowercase()) {
                    Some(imported) => imported.clone(),
                    None => self.qualify(&name.text),
                }
            }
        }
    }

    /// Resolve a function reference. Unqualified names that are not imported
    /// resolve into the current namespace; callers fall back to the global
    /// function when that one does not exist.
    pub fn resolve_function_name(&self, name: &NameData) -> String {
        match name.kind {
            NameKind::FullyQualified => name.text.clone(),
            NameKind::Qualified => {
                let (first, rest) = name.text.split_once('\\').unwrap_or((&name.text, ""));
                match self.class_imports.get(&first.to_ascii_lowercase()) {
                    Some(imported) => format!("{imported}\\{rest}"),
                    None => self.qualify(&name.text),
                }
            }
            NameKind::Unqualified => match self.function_imports.get(&name.text.to_ascii_lowercase()) {
                Some(imported) => imported.clone(),
                None => self.qualify(&name.text),
            },
        }
    }
}
