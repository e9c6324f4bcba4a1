//! Typed access to node payloads.

use crate::base::NodeIndex;
use crate::node::*;
use crate::node_arena::NodeArena;
use phz_scanner::SyntaxKind;

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_metadata(&self, index: NodeIndex) -> Option<&NodeMetadata> {
        if index.is_none() {
            None
        } else {
            self.metadata.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_metadata_mut(&mut self, index: NodeIndex) -> Option<&mut NodeMetadata> {
        if index.is_none() {
            None
        } else {
            self.metadata.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|node| node.kind)
    }

    #[inline]
    pub fn get_source_file<'a>(&self, node: &'a Node) -> Option<&'a SourceFileData> {
        match &node.data {
            NodeData::SourceFile(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_namespace<'a>(&self, node: &'a Node) -> Option<&'a NamespaceData> {
        match &node.data {
            NodeData::Namespace(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_use<'a>(&self, node: &'a Node) -> Option<&'a UseData> {
        match &node.data {
            NodeData::Use(data) => Some(data),
            _ => None,
        }
    }

    /// Class, interface or trait payload.
    #[inline]
    pub fn get_class_like<'a>(&self, node: &'a Node) -> Option<&'a ClassLikeData> {
        match &node.data {
            NodeData::ClassLike(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_trait_use<'a>(&self, node: &'a Node) -> Option<&'a TraitUseData> {
        match &node.data {
            NodeData::TraitUse(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_property<'a>(&self, node: &'a Node) -> Option<&'a PropertyData> {
        match &node.data {
            NodeData::Property(data) => Some(data),
            _ => None,
        }
    }

    /// Function or method payload.
    #[inline]
    pub fn get_function<'a>(&self, node: &'a Node) -> Option<&'a FunctionData> {
        match &node.data {
            NodeData::Function(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_parameter<'a>(&self, node: &'a Node) -> Option<&'a ParameterData> {
        match &node.data {
            NodeData::Parameter(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_block<'a>(&self, node: &'a Node) -> Option<&'a BlockData> {
        match &node.data {
            NodeData::Block(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_assign<'a>(&self, node: &'a Node) -> Option<&'a AssignData> {
        match &node.data {
            NodeData::Assign(data) => Some(data),
            _ => None,
        }
    }

    /// Method, static or function call payload.
    #[inline]
    pub fn get_call<'a>(&self, node: &'a Node) -> Option<&'a CallData> {
        match &node.data {
            NodeData::Call(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_access<'a>(&self, node: &'a Node) -> Option<&'a AccessData> {
        match &node.data {
            NodeData::Access(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_new<'a>(&self, node: &'a Node) -> Option<&'a NewData> {
        match &node.data {
            NodeData::New(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_parenthesized<'a>(&self, node: &'a Node) -> Option<&'a ParenthesizedData> {
        match &node.data {
            NodeData::Parenthesized(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_variable<'a>(&self, node: &'a Node) -> Option<&'a VariableData> {
        match &node.data {
            NodeData::Variable(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_name<'a>(&self, node: &'a Node) -> Option<&'a NameData> {
        match &node.data {
            NodeData::Name(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_identifier<'a>(&self, node: &'a Node) -> Option<&'a IdentifierData> {
        match &node.data {
            NodeData::Identifier(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_literal<'a>(&self, node: &'a Node) -> Option<&'a LiteralData> {
        match &node.data {
            NodeData::Literal(data) => Some(data),
            _ => None,
        }
    }

    /// Text of an `Identifier` node.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node).map(|data| data.text.as_str())
    }

    /// Variable name without `$`, for plain variables.
    pub fn variable_name(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_variable(node)?.name.as_deref()
    }

    /// Declared short name of a class-like or function declaration.
    pub fn declaration_name(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        let name = match &node.data {
            NodeData::ClassLike(data) => data.name,
            NodeData::Function(data) => data.name,
            _ => return None,
        };
        self.identifier_text(name)
    }

    /// Fully-qualified name recorded by the scope decorator.
    pub fn resolved_name(&self, index: NodeIndex) -> Option<&str> {
        self.get_metadata(index)?.resolved_name.as_deref()
    }

    /// Method declaration named `name` (case-insensitive) among a class-like's members.
    pub fn find_method(&self, class_like: NodeIndex, name: &str) -> Option<NodeIndex> {
        let node = self.get(class_like)?;
        let data = self.get_class_like(node)?;
        data.members.iter().find(|member| {
            self.kind(*member) == Some(SyntaxKind::MethodDeclaration)
                && self
                    .declaration_name(*member)
                    .is_some_and(|declared| declared.eq_ignore_ascii_case(name))
        })
    }

    /// Skip any parentheses around an expression.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(inner) = self
            .get(index)
            .and_then(|node| self.get_parenthesized(node))
            .map(|data| data.expression)
        {
            index = inner;
        }
        index
    }
}
