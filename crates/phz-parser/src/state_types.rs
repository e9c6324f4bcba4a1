//! Parser state - type annotation parsing.

use crate::node::NameData;
use crate::state::{ParseDiagnostic, ParserState};
use crate::type_node::{TypeNode, is_builtin_type_name};
use phz_scanner::SyntaxKind;

/// Prefix that puts the scanner into PHP mode for a lone annotation.
const ANNOTATION_PREFIX: &str = "<?php ";

impl ParserState {
    /// Parse `text` as a standalone type annotation such as `?Foo` or
    /// `int|string`. Diagnostic offsets are relative to `text`.
    pub fn parse_type_annotation(text: &str) -> Result<TypeNode, Vec<ParseDiagnostic>> {
        let mut parser = ParserState::new("<annotation>".to_string(), format!("{ANNOTATION_PREFIX}{text}"));
        parser.next_token();
        if parser.is_token(SyntaxKind::OpenTagToken) {
            parser.next_token();
        }
        let ty = parser.parse_type();
        if ty.is_some() && !parser.is_token(SyntaxKind::EndOfFileToken) {
            parser.parse_error_at_current_token("unexpected text after type");
        }
        match ty {
            Some(ty) if parser.parse_diagnostics.is_empty() => Ok(ty),
            _ => {
                let offset = ANNOTATION_PREFIX.len() as u32;
                Err(parser
                    .parse_diagnostics
                    .into_iter()
                    .map(|diagnostic| ParseDiagnostic {
                        start: diagnostic.start.saturating_sub(offset),
                        ..diagnostic
                    })
                    .collect())
            }
        }
    }

    /// Whether the current token can begin a type annotation.
    pub(crate) fn starts_type(&self) -> bool {
        self.token().is_name_token()
            || matches!(
                self.token(),
                SyntaxKind::QuestionToken | SyntaxKind::StaticKeyword | SyntaxKind::OpenParenToken
            )
    }

    /// `?T`, `A|B`, `A&B` or `(A&B)|null`. Returns `None` after reporting an error.
    pub(crate) fn parse_type(&mut self) -> Option<TypeNode> {
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return self.parse_single_type().map(TypeNode::nullable);
        }

        let first = self.parse_intersection_or_group()?;
        if !self.is_token(SyntaxKind::BarToken) {
            return Some(first);
        }
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_or_group()?);
        }
        Some(TypeNode::Union(types))
    }

    fn parse_intersection_or_group(&mut self) -> Option<TypeNode> {
        if self.parse_optional(SyntaxKind::OpenParenToken) {
            let inner = self.parse_intersection()?;
            self.parse_expected(SyntaxKind::CloseParenToken, ")");
            return Some(inner);
        }
        self.parse_intersection()
    }

    fn parse_intersection(&mut self) -> Option<TypeNode> {
        let first = self.parse_single_type()?;
        let mut types = vec![first];
        // `Foo &$x` is a by-reference parameter, `Foo&Bar $x` an intersection.
        while self.is_token(SyntaxKind::AmpersandToken)
            && self.look_ahead(|p| {
                let next = p.next_token();
                next.is_name_token() || next == SyntaxKind::StaticKeyword
            })
        {
            self.next_token();
            types.push(self.parse_single_type()?);
        }
        if types.len() == 1 {
            types.pop()
        } else {
            Some(TypeNode::Intersection(types))
        }
    }

    fn parse_single_type(&mut self) -> Option<TypeNode> {
        let ty = match self.token() {
            SyntaxKind::StaticKeyword => TypeNode::identifier("static"),
            SyntaxKind::Identifier if is_builtin_type_name(self.token_text()) => {
                TypeNode::identifier(self.token_text())
            }
            kind if kind.is_name_token() => TypeNode::Name(NameData::new(self.token_value())),
            _ => {
                self.parse_error_at_current_token("type expected");
                return None;
            }
        };
        self.next_token();
        Some(ty)
    }
}
