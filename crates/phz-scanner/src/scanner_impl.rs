//! Scanner state machine.
//!
//! Produces one token per `scan()` call. Trivia (whitespace, comments and
//! attribute groups) is skipped; the most recent doc comment is kept until
//! the parser claims it with `take_doc_comment` or a statement boundary
//! (`;`, `{`, `}`) discards it.

use crate::SyntaxKind;
use memchr::memmem;

/// Saved scanner position for look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    in_php: bool,
    pending_doc_comment: Option<String>,
}

pub struct ScannerState {
    source: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    /// Cooked value: unescaped string contents, variable name without `$`.
    token_value: String,
    in_php: bool,
    pending_doc_comment: Option<String>,
}

/// Multi-character operators, longest first.
const COMPOUND_OPERATORS: &[&str] = &[
    "**=", "<=>", "===", "!==", "<<=", ">>=", "??=", "==", "!=", "<>", "<=", ">=", "&&", "||",
    "??", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "**", "<<", ">>", "|=", "&=", "^=",
];

impl ScannerState {
    pub fn new(source: String) -> ScannerState {
        ScannerState {
            source,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            in_php: false,
            pending_doc_comment: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        self.source.get(self.token_start..self.pos).unwrap_or_default()
    }

    /// Cooked value of the current token (see field docs).
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn take_doc_comment(&mut self) -> Option<String> {
        self.pending_doc_comment.take()
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            in_php: self.in_php,
            pending_doc_comment: self.pending_doc_comment.clone(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.in_php = snapshot.in_php;
        self.pending_doc_comment = snapshot.pending_doc_comment;
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_value.clear();

        if !self.in_php {
            self.token = self.scan_inline_html();
            return self.token;
        }

        self.skip_trivia();
        self.token_start = self.pos;

        let bytes = self.source.as_bytes();
        let Some(&ch) = bytes.get(self.pos) else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        let kind = match ch {
            b'$' => self.scan_variable(),
            b'\\' => self.scan_name(),
            b'\'' => self.scan_single_quoted(),
            b'"' => self.scan_double_quoted(),
            b'0'..=b'9' => self.scan_number(),
            b'.' if bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => self.scan_number(),
            c if is_identifier_start(c) => self.scan_name(),
            _ => self.scan_punctuation(),
        };

        if matches!(
            kind,
            SyntaxKind::SemicolonToken | SyntaxKind::OpenBraceToken | SyntaxKind::CloseBraceToken
        ) {
            self.pending_doc_comment = None;
        }

        self.token = kind;
        kind
    }

    fn scan_inline_html(&mut self) -> SyntaxKind {
        self.token_start = self.pos;
        if self.pos >= self.source.len() {
            return SyntaxKind::EndOfFileToken;
        }

        let rest = &self.source.as_bytes()[self.pos..];
        match memmem::find(rest, b"<?php").or_else(|| memmem::find(rest, b"<?=")) {
            Some(0) => {
                let tag_len = if rest.starts_with(b"<?php") { 5 } else { 3 };
                self.pos += tag_len;
                self.in_php = true;
                SyntaxKind::OpenTagToken
            }
            Some(offset) => {
                self.pos += offset;
                SyntaxKind::InlineHtml
            }
            None => {
                self.pos = self.source.len();
                SyntaxKind::InlineHtml
            }
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let bytes = self.source.as_bytes();
            let Some(&ch) = bytes.get(self.pos) else {
                return;
            };
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'#' if bytes.get(self.pos + 1) == Some(&b'[') => self.skip_attribute_group(),
                b'#' => self.skip_line_comment(),
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => self.skip_line_comment(),
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let bytes = self.source.as_bytes();
        while let Some(&ch) = bytes.get(self.pos) {
            if ch == b'\n' {
                return;
            }
            // `?>` ends a line comment as well.
            if ch == b'?' && bytes.get(self.pos + 1) == Some(&b'>') {
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        let body_start = start + 2;
        let rest = &self.source.as_bytes()[body_start..];
        let end = match memmem::find(rest, b"*/") {
            Some(offset) => body_start + offset + 2,
            None => self.source.len(),
        };
        let text = &self.source[start..end];
        if text.starts_with("/**") && text.len() > 4 {
            self.pending_doc_comment = Some(text.to_string());
        }
        self.pos = end;
    }

    /// `#[...]` attribute groups carry no declaration information we need.
    fn skip_attribute_group(&mut self) {
        let mut depth = 0usize;
        while let Some(&ch) = self.source.as_bytes().get(self.pos) {
            self.pos += 1;
            match ch {
                b'[' => depth += 1,
                b']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                b'\'' | b'"' => self.skip_quoted(ch),
                _ => {}
            }
        }
    }

    fn skip_quoted(&mut self, quote: u8) {
        let bytes = self.source.as_bytes();
        while let Some(&ch) = bytes.get(self.pos) {
            self.pos += 1;
            if ch == b'\\' {
                self.pos += 1;
            } else if ch == quote {
                return;
            }
        }
    }

    fn scan_variable(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        if bytes.get(self.pos + 1).is_some_and(|c| is_identifier_start(*c)) {
            self.pos += 1;
            let name_start = self.pos;
            self.consume_identifier_part();
            self.token_value = self.source[name_start..self.pos].to_string();
            SyntaxKind::VariableToken
        } else {
            self.pos += 1;
            SyntaxKind::DollarToken
        }
    }

    fn consume_identifier_part(&mut self) {
        let bytes = self.source.as_bytes();
        while bytes.get(self.pos).is_some_and(|c| is_identifier_part(*c)) {
            self.pos += 1;
        }
    }

    /// Scans `Foo`, `Foo\Bar` and `\Foo\Bar`, mapping bare keywords.
    fn scan_name(&mut self) -> SyntaxKind {
        let fully_qualified = self.source.as_bytes()[self.pos] == b'\\';
        if fully_qualified {
            self.pos += 1;
            if !self
                .source
                .as_bytes()
                .get(self.pos)
                .is_some_and(|c| is_identifier_start(*c))
            {
                return SyntaxKind::Unknown;
            }
        }

        let mut segments = 1;
        self.consume_identifier_part();
        loop {
            let bytes = self.source.as_bytes();
            if bytes.get(self.pos) == Some(&b'\\')
                && bytes
                    .get(self.pos + 1)
                    .is_some_and(|c| is_identifier_start(*c))
            {
                self.pos += 1;
                self.consume_identifier_part();
                segments += 1;
            } else {
                break;
            }
        }

        let text = &self.source[self.token_start..self.pos];
        self.token_value = text.to_string();
        if fully_qualified {
            SyntaxKind::FullyQualifiedName
        } else if segments > 1 {
            SyntaxKind::QualifiedName
        } else {
            SyntaxKind::keyword_from_str(text).unwrap_or(SyntaxKind::Identifier)
        }
    }

    fn scan_single_quoted(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        let mut value = String::new();
        self.pos += 1;
        let mut chunk_start = self.pos;
        while let Some(&ch) = bytes.get(self.pos) {
            match ch {
                b'\\' if matches!(bytes.get(self.pos + 1), Some(b'\'') | Some(b'\\')) => {
                    value.push_str(&self.source[chunk_start..self.pos]);
                    value.push(bytes[self.pos + 1] as char);
                    self.pos += 2;
                    chunk_start = self.pos;
                }
                b'\'' => {
                    value.push_str(&self.source[chunk_start..self.pos]);
                    self.pos += 1;
                    self.token_value = value;
                    return SyntaxKind::StringLiteral;
                }
                _ => self.pos += 1,
            }
        }
        // Unterminated literal.
        SyntaxKind::Unknown
    }

    /// Double-quoted strings keep interpolation sequences verbatim.
    fn scan_double_quoted(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        let mut value = String::new();
        self.pos += 1;
        while let Some(&ch) = bytes.get(self.pos) {
            match ch {
                b'\\' => {
                    let escaped = bytes.get(self.pos + 1).copied();
                    match escaped {
                        Some(b'n') => value.push('\n'),
                        Some(b't') => value.push('\t'),
                        Some(b'"') => value.push('"'),
                        Some(b'\\') => value.push('\\'),
                        Some(b'$') => value.push('$'),
                        Some(other) => {
                            value.push('\\');
                            value.push(other as char);
                        }
                        None => value.push('\\'),
                    }
                    self.pos += 2;
                }
                b'"' => {
                    self.pos += 1;
                    self.token_value = value;
                    return SyntaxKind::StringLiteral;
                }
                _ => {
                    let char_len = utf8_len(ch);
                    let end = (self.pos + char_len).min(self.source.len());
                    value.push_str(self.source.get(self.pos..end).unwrap_or_default());
                    self.pos = end;
                }
            }
        }
        SyntaxKind::Unknown
    }

    /// `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'` through the closing label.
    /// The body is kept verbatim minus the closing label's indentation.
    fn scan_heredoc(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        let mut cursor = self.pos + 3;
        while matches!(bytes.get(cursor), Some(b' ' | b'\t')) {
            cursor += 1;
        }
        let quote = match bytes.get(cursor) {
            Some(&quote @ (b'\'' | b'"')) => {
                cursor += 1;
                Some(quote)
            }
            _ => None,
        };
        let label_start = cursor;
        if !bytes.get(cursor).is_some_and(|c| is_identifier_start(*c)) {
            self.pos += 3;
            return SyntaxKind::Unknown;
        }
        while bytes.get(cursor).is_some_and(|c| is_identifier_part(*c)) {
            cursor += 1;
        }
        let label = &self.source[label_start..cursor];
        if let Some(quote) = quote {
            if bytes.get(cursor) != Some(&quote) {
                self.pos = cursor;
                return SyntaxKind::Unknown;
            }
            cursor += 1;
        }
        let Some(offset) = memchr::memchr(b'\n', &bytes[cursor..]) else {
            self.pos = self.source.len();
            return SyntaxKind::Unknown;
        };

        let body_start = cursor + offset + 1;
        let mut line_start = body_start;
        while line_start <= self.source.len() {
            let line_end = memchr::memchr(b'\n', &bytes[line_start..])
                .map_or(self.source.len(), |offset| line_start + offset);
            let line = &self.source[line_start..line_end];
            let trimmed = line.trim_start_matches([' ', '\t']);
            let closes = trimmed
                .strip_prefix(label)
                .is_some_and(|after| !after.bytes().next().is_some_and(is_identifier_part));
            if closes {
                let indent = line.len() - trimmed.len();
                let body_end = if line_start == body_start {
                    body_start
                } else {
                    line_start - 1
                };
                let body = self.source[body_start..body_end].trim_end_matches('\r');
                self.token_value = strip_indent(body, indent);
                self.pos = line_start + indent + label.len();
                return SyntaxKind::StringLiteral;
            }
            if line_end >= self.source.len() {
                break;
            }
            line_start = line_end + 1;
        }
        // Unterminated heredoc.
        self.pos = self.source.len();
        SyntaxKind::Unknown
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.source.as_bytes();
        while let Some(&ch) = bytes.get(self.pos) {
            let continues = ch.is_ascii_alphanumeric()
                || ch == b'_'
                || (ch == b'.' && bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit));
            if !continues {
                break;
            }
            self.pos += 1;
        }
        self.token_value = self.source[self.token_start..self.pos].replace('_', "");
        SyntaxKind::NumericLiteral
    }

    fn scan_punctuation(&mut self) -> SyntaxKind {
        let rest = &self.source.as_bytes()[self.pos..];
        let two = |a: u8, b: u8| rest.len() >= 2 && rest[0] == a && rest[1] == b;

        if rest.starts_with(b"<<<") {
            return self.scan_heredoc();
        }

        let (kind, len) = if rest.starts_with(b"...") {
            (SyntaxKind::DotDotDotToken, 3)
        } else if rest.starts_with(b"?->") {
            (SyntaxKind::QuestionMinusGreaterThanToken, 3)
        } else if two(b'?', b'>') {
            self.in_php = false;
            // A single newline directly after `?>` belongs to the tag.
            let len = if rest.get(2) == Some(&b'\n') { 3 } else { 2 };
            (SyntaxKind::CloseTagToken, len)
        } else if two(b'-', b'>') {
            (SyntaxKind::MinusGreaterThanToken, 2)
        } else if two(b'=', b'>') {
            (SyntaxKind::EqualsGreaterThanToken, 2)
        } else if two(b':', b':') {
            (SyntaxKind::ColonColonToken, 2)
        } else if let Some(op) = COMPOUND_OPERATORS
            .iter()
            .find(|op| rest.starts_with(op.as_bytes()))
        {
            (SyntaxKind::OperatorToken, op.len())
        } else {
            let kind = match rest[0] {
                b'(' => SyntaxKind::OpenParenToken,
                b')' => SyntaxKind::CloseParenToken,
                b'{' => SyntaxKind::OpenBraceToken,
                b'}' => SyntaxKind::CloseBraceToken,
                b'[' => SyntaxKind::OpenBracketToken,
                b']' => SyntaxKind::CloseBracketToken,
                b';' => SyntaxKind::SemicolonToken,
                b',' => SyntaxKind::CommaToken,
                b':' => SyntaxKind::ColonToken,
                b'?' => SyntaxKind::QuestionToken,
                b'|' => SyntaxKind::BarToken,
                b'&' => SyntaxKind::AmpersandToken,
                b'=' => SyntaxKind::EqualsToken,
                b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'!' | b'.' | b'^' | b'~'
                | b'@' => SyntaxKind::OperatorToken,
                other => {
                    self.pos += utf8_len(other);
                    return SyntaxKind::Unknown;
                }
            };
            (kind, 1)
        };

        self.pos += len;
        if kind == SyntaxKind::OperatorToken {
            self.token_value = self.source[self.token_start..self.pos].to_string();
        }
        kind
    }
}

fn strip_indent(body: &str, indent: usize) -> String {
    if indent == 0 {
        return body.to_string();
    }
    body.split('\n')
        .map(|line| {
            let cut = line
                .bytes()
                .take(indent)
                .take_while(|c| matches!(c, b' ' | b'\t'))
                .count();
            &line[cut..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[inline]
fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch >= 0x80
}

#[inline]
fn is_identifier_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch >= 0x80
}

#[inline]
fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}
