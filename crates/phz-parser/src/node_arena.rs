//! Arena storage for parsed nodes, their decoration metadata and name scopes.

use crate::base::NodeIndex;
use crate::node::{NameScope, Node, NodeMetadata, ScopeId};
use phz_common::limits::NODES_PER_SOURCE_BYTE_DIVISOR;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    /// Parallel to `nodes`. Filled by the scope decorator.
    pub metadata: Vec<NodeMetadata>,
    pub scopes: Vec<NameScope>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            metadata: Vec::with_capacity(capacity),
            scopes: Vec::new(),
        }
    }

    /// Pre-size for a source file of `len` bytes.
    pub fn for_source_len(len: usize) -> NodeArena {
        NodeArena::with_capacity(len / NODES_PER_SOURCE_BYTE_DIVISOR + 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and point its children's parent links at it.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let mut children = SmallVec::<[NodeIndex; 8]>::new();
        node.data.collect_children(&mut children);
        self.nodes.push(node);
        self.metadata.push(NodeMetadata::default());
        for child in children {
            if let Some(child_node) = self.get_mut(child) {
                child_node.parent = index;
            }
        }
        index
    }

    /// Children in source order.
    pub fn children(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut out = SmallVec::new();
        if let Some(node) = self.get(index) {
            node.data.collect_children(&mut out);
        }
        out
    }

    pub fn add_scope(&mut self, scope: NameScope) -> ScopeId {
        if let Some(pos) = self.scopes.iter().position(|existing| *existing == scope) {
            return ScopeId(pos as u32);
        }
        self.scopes.push(scope);
        ScopeId(self.scopes.len() as u32 - 1)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&NameScope> {
        if id == ScopeId::NONE {
            None
        } else {
            self.scopes.get(id.0 as usize)
        }
    }

    /// Scope in effect at `index`, if the arena has been decorated.
    pub fn scope_of(&self, index: NodeIndex) -> Option<&NameScope> {
        self.get_metadata(index)
            .and_then(|metadata| self.scope(metadata.scope))
    }

    /// Pre-order walk of the subtree rooted at `root`.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if self.get(index).is_none() {
                continue;
            }
            out.push(index);
            let children = self.children(index);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Copy the subtree rooted at `root` into a fresh arena.
    ///
    /// Indices are renumbered, links that point outside the subtree become
    /// `NONE`, and scopes are carried over unchanged so scope ids stay valid.
    pub fn detach_subtree(&self, root: NodeIndex) -> (NodeArena, NodeIndex) {
        let order = self.descendants(root);
        let mut remap_table: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        for (new, old) in order.iter().enumerate() {
            remap_table.insert(*old, NodeIndex(new as u32));
        }
        let mut remap =
            |index: NodeIndex| remap_table.get(&index).copied().unwrap_or(NodeIndex::NONE);

        let mut detached = NodeArena::with_capacity(order.len());
        detached.scopes = self.scopes.clone();
        for old in &order {
            let Some(node) = self.get(*old) else {
                continue;
            };
            let mut copy = node.clone();
            copy.parent = remap(node.parent);
            copy.data.remap_children(&mut remap);
            detached.nodes.push(copy);

            let mut metadata = self.get_metadata(*old).cloned().unwrap_or_default();
            metadata.class_like = remap(metadata.class_like);
            metadata.function = remap(metadata.function);
            detached.metadata.push(metadata);
        }

        let new_root = if order.is_empty() {
            NodeIndex::NONE
        } else {
            NodeIndex(0)
        };
        (detached, new_root)
    }
}
