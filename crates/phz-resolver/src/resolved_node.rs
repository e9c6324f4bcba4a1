//! Declarations extracted from a parsed file.

use phz_common::Span;
use phz_parser::{NodeArena, NodeIndex, SourceUnit};
use phz_scanner::SyntaxKind;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// A declaration subtree copied out of its file's arena, so the rest of the
/// file can be dropped. Cache hits hand out clones of the same `Arc`.
#[derive(Debug, PartialEq, Serialize)]
pub struct ResolvedDeclaration {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub kind: SyntaxKind,
    /// Declared short name.
    pub name: String,
    pub path: PathBuf,
    /// Byte range of the declaration in the original file.
    pub span: Span,
    /// Source text of the declaration.
    pub text: String,
}

pub type ResolvedNode = Arc<ResolvedDeclaration>;

impl ResolvedDeclaration {
    /// Copy the declaration at `index` out of `unit`.
    pub fn extract(unit: &SourceUnit, index: NodeIndex) -> Option<ResolvedNode> {
        let node = unit.arena.get(index)?;
        let name = unit.arena.declaration_name(index)?.to_string();
        let span = Span::new(node.pos, node.end);
        let text = span.text(&unit.text).to_string();
        let (arena, root) = unit.arena.detach_subtree(index);
        Some(Arc::new(ResolvedDeclaration {
            arena,
            root,
            kind: node.kind,
            name,
            path: unit.path.clone(),
            span,
            text,
        }))
    }

    /// Fully-qualified name of the enclosing class, for methods and class-likes.
    pub fn class_name(&self) -> Option<&str> {
        self.arena.get_metadata(self.root)?.class_name.as_deref()
    }
}
