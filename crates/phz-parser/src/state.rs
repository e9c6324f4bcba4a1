//! Parser state: token cursor, node construction and diagnostics.
//!
//! The parse methods themselves live in `state_statements`,
//! `state_expressions` and `state_types`.

use crate::base::NodeIndex;
use crate::node::{IdentifierData, Node, NodeData};
use crate::node_arena::NodeArena;
use phz_common::limits::MAX_PARSE_DEPTH;
use phz_scanner::{ScannerState, SyntaxKind};
use serde::Serialize;

/// A syntax error found while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    /// Current statement/expression nesting.
    pub(crate) depth: u32,
    /// End of the last consumed token; used as the end of finished nodes.
    pub(crate) prev_token_end: u32,
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let arena = NodeArena::for_source_len(source_text.len());
        ParserState {
            scanner: ScannerState::new(source_text),
            arena,
            file_name,
            parse_diagnostics: Vec::new(),
            depth: 0,
            prev_token_end: 0,
            last_error_pos: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    /// Split into the arena, the source text and the collected diagnostics.
    pub fn into_parts(self) -> (NodeArena, String, Vec<ParseDiagnostic>) {
        (self.arena, self.scanner.into_source(), self.parse_diagnostics)
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    /// Cooked token value (see `ScannerState::token_value`).
    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    #[inline]
    pub(crate) fn token_text(&self) -> &str {
        self.scanner.token_text()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end();
        self.scanner.scan()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token() == kind
    }

    /// Whether the current token is an identifier with the given
    /// (case-insensitive) spelling. Covers contextual words like `instanceof`.
    pub(crate) fn is_identifier_text(&self, text: &str) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.token_text().eq_ignore_ascii_case(text)
    }

    /// Identifier or any keyword; member names may be reserved words.
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.is_token(SyntaxKind::Identifier) || self.token().is_keyword()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind, expected: &str) -> bool {
        if self.parse_optional(kind) {
            true
        } else {
            self.parse_error_at_current_token(&format!("'{expected}' expected"));
            false
        }
    }

    /// `;` or an implicit terminator before `?>`.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) || self.is_token(SyntaxKind::CloseTagToken) {
            true
        } else {
            self.parse_error_at_current_token("';' expected");
            false
        }
    }

    /// Run `f` and rewind the scanner afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let prev_token_end = self.prev_token_end;
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.prev_token_end = prev_token_end;
        result
    }

    pub(crate) fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| p.next_token() == kind)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Record an error at the current token. Only the first error per
    /// position is kept.
    pub(crate) fn parse_error_at_current_token(&mut self, message: &str) {
        let start = self.token_pos();
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        let length = self.token_end().saturating_sub(start);
        tracing::trace!(file = %self.file_name, start, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
        });
    }

    /// Returns false (and records an error) when nesting gets too deep.
    pub(crate) fn enter_nested(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            self.parse_error_at_current_token("maximum nesting depth exceeded");
            return false;
        }
        true
    }

    #[inline]
    pub(crate) fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    /// Finish a node that started at `pos` and ends at the last consumed token.
    pub(crate) fn finish_node(&mut self, kind: SyntaxKind, pos: u32, data: NodeData) -> NodeIndex {
        let end = self.prev_token_end.max(pos);
        self.arena.add(Node::new(kind, pos, end, data))
    }

    /// Consume the current token as an `Identifier` node.
    pub(crate) fn parse_identifier_node(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.token_text().to_string();
        self.next_token();
        self.finish_node(
            SyntaxKind::Identifier,
            pos,
            NodeData::Identifier(IdentifierData { text }),
        )
    }
}
