//! Parsing of single source files into decorated syntax trees.

use crate::base::NodeIndex;
use crate::decorator::{Decorator, ScopeDecorator};
use crate::node_arena::NodeArena;
use crate::state::{ParseDiagnostic, ParserState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A parsed file: the tree plus the text and path it came from.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
}

/// Turns source text into a syntax tree. `None` means the text could not be
/// parsed.
pub trait SourceParser: Send + Sync {
    fn parse(&self, path: &Path, text: &str) -> Option<SourceUnit>;
}

/// Parser for the supported PHP subset. Any syntax error makes the file
/// unparseable.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhpSourceParser;

impl PhpSourceParser {
    pub fn new() -> PhpSourceParser {
        PhpSourceParser
    }

    /// Parse regardless of errors and return the diagnostics alongside.
    pub fn parse_with_diagnostics(&self, path: &Path, text: &str) -> (SourceUnit, Vec<ParseDiagnostic>) {
        let mut parser = ParserState::new(path.display().to_string(), text.to_string());
        let root = parser.parse_source_file();
        let (arena, text, diagnostics) = parser.into_parts();
        let unit = SourceUnit {
            path: path.to_path_buf(),
            text,
            arena,
            root,
        };
        (unit, diagnostics)
    }
}

impl SourceParser for PhpSourceParser {
    fn parse(&self, path: &Path, text: &str) -> Option<SourceUnit> {
        let (unit, diagnostics) = self.parse_with_diagnostics(path, text);
        if let Some(first) = diagnostics.first() {
            debug!(
                path = %path.display(),
                errors = diagnostics.len(),
                first = %first.message,
                at = first.start,
                "source file is not parseable"
            );
            return None;
        }
        Some(unit)
    }
}

/// Parse-then-decorate pipeline for single files. Holds no per-file state.
#[derive(Clone)]
pub struct SyntaxStore {
    parser: Arc<dyn SourceParser>,
    decorator: Arc<dyn Decorator>,
}

impl SyntaxStore {
    pub fn new(parser: Arc<dyn SourceParser>, decorator: Arc<dyn Decorator>) -> SyntaxStore {
        SyntaxStore { parser, decorator }
    }

    /// Parse and decorate `text`. `None` when the parser rejects it.
    pub fn parse_file(&self, path: &Path, text: &str) -> Option<SourceUnit> {
        let unit = self.parser.parse(path, text)?;
        Some(self.decorator.decorate(unit))
    }
}

impl Default for SyntaxStore {
    fn default() -> Self {
        SyntaxStore::new(Arc::new(PhpSourceParser), Arc::new(ScopeDecorator))
    }
}
