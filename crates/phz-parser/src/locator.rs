//! Stateless node search over a tree or a forest.
//!
//! Traversal is pre-order in source order and includes the roots themselves.

use crate::base::NodeIndex;
use crate::node::Node;
use crate::node_arena::NodeArena;
use phz_scanner::SyntaxKind;

#[derive(Clone, Copy, Debug, Default)]
pub struct NodeLocator;

impl NodeLocator {
    pub fn new() -> NodeLocator {
        NodeLocator
    }

    /// First node under `root` matching `predicate`.
    pub fn find_first<F>(&self, arena: &NodeArena, root: NodeIndex, predicate: F) -> Option<NodeIndex>
    where
        F: FnMut(&NodeArena, NodeIndex, &Node) -> bool,
    {
        self.find_first_in(arena, &[root], predicate)
    }

    /// First node in any of `roots`, in order, matching `predicate`.
    pub fn find_first_in<F>(
        &self,
        arena: &NodeArena,
        roots: &[NodeIndex],
        mut predicate: F,
    ) -> Option<NodeIndex>
    where
        F: FnMut(&NodeArena, NodeIndex, &Node) -> bool,
    {
        let mut stack: Vec<NodeIndex> = roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let Some(node) = arena.get(index) else {
                continue;
            };
            if predicate(arena, index, node) {
                return Some(index);
            }
            stack.extend(arena.children(index).into_iter().rev());
        }
        None
    }

    /// All nodes under `root` matching `predicate`.
    pub fn find_all<F>(&self, arena: &NodeArena, root: NodeIndex, predicate: F) -> Vec<NodeIndex>
    where
        F: FnMut(&NodeArena, NodeIndex, &Node) -> bool,
    {
        self.find_all_in(arena, &[root], predicate)
    }

    pub fn find_all_in<F>(&self, arena: &NodeArena, roots: &[NodeIndex], mut predicate: F) -> Vec<NodeIndex>
    where
        F: FnMut(&NodeArena, NodeIndex, &Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<NodeIndex> = roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let Some(node) = arena.get(index) else {
                continue;
            };
            if predicate(arena, index, node) {
                found.push(index);
            }
            stack.extend(arena.children(index).into_iter().rev());
        }
        found
    }

    /// First node whose kind is one of `kinds`.
    pub fn find_first_of_kind(
        &self,
        arena: &NodeArena,
        root: NodeIndex,
        kinds: &[SyntaxKind],
    ) -> Option<NodeIndex> {
        self.find_first(arena, root, |_, _, node| kinds.contains(&node.kind))
    }

    /// All nodes whose kind is one of `kinds`.
    pub fn find_all_of_kind(&self, arena: &NodeArena, root: NodeIndex, kinds: &[SyntaxKind]) -> Vec<NodeIndex> {
        self.find_all(arena, root, |_, _, node| kinds.contains(&node.kind))
    }

    /// Class, interface and trait declarations.
    pub fn find_class_likes(&self, arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
        self.find_all(arena, root, |_, _, node| node.kind.is_class_like())
    }
}
