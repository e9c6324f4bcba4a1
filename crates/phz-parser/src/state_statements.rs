//! Parser state - statement and declaration parsing methods.

use crate::base::{NodeIndex, NodeList};
use crate::node::*;
use crate::state::ParserState;
use phz_scanner::SyntaxKind;

/// Statement keywords outside the supported subset. Statements starting with
/// one of these are skipped as balanced token runs.
const SKIPPED_STATEMENT_WORDS: &[&str] = &[
    "break", "catch", "continue", "declare", "die", "do", "echo", "exit", "finally",
    "for", "foreach", "global", "goto", "include", "include_once", "print", "require",
    "require_once", "switch", "throw", "try", "unset", "while", "yield",
];

/// Words that continue a skipped statement after its closing brace.
const SKIPPED_CONTINUATION_WORDS: &[&str] = &["catch", "finally", "while"];

impl ParserState {
    // =========================================================================
    // Source file and statement lists
    // =========================================================================

    /// Parse a whole file. The returned index is the `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();
        let statements = self.parse_statement_list(SyntaxKind::EndOfFileToken, false);
        let end = self.token_end();
        self.prev_token_end = end;
        self.finish_node(
            SyntaxKind::SourceFile,
            0,
            NodeData::SourceFile(SourceFileData { statements }),
        )
    }

    /// Parse statements until `closing` (not consumed) or end of file.
    /// With `stop_at_namespace`, also stop before a namespace declaration.
    pub(crate) fn parse_statement_list(
        &mut self,
        closing: SyntaxKind,
        stop_at_namespace: bool,
    ) -> NodeList {
        let mut statements = NodeList::new();
        while !self.is_token(closing) && !self.is_token(SyntaxKind::EndOfFileToken) {
            if stop_at_namespace && self.is_namespace_declaration_start() {
                break;
            }
            let start = self.token_pos();
            let start_token = self.token();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            // Always make progress.
            if self.token_pos() == start && self.token() == start_token {
                self.parse_error_at_current_token("declaration or statement expected");
                self.next_token();
            }
        }
        statements
    }

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_nested() {
            self.exit_nested();
            self.next_token();
            return NodeIndex::NONE;
        }
        let statement = self.parse_statement_worker();
        self.exit_nested();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenTagToken | SyntaxKind::CloseTagToken | SyntaxKind::SemicolonToken => {
                self.next_token();
                NodeIndex::NONE
            }
            SyntaxKind::InlineHtml => {
                let pos = self.token_pos();
                let value = self.token_text().to_string();
                self.next_token();
                self.finish_node(
                    SyntaxKind::InlineHtmlStatement,
                    pos,
                    NodeData::Literal(LiteralData { value }),
                )
            }
            SyntaxKind::NamespaceKeyword if self.is_namespace_declaration_start() => {
                self.parse_namespace_declaration()
            }
            SyntaxKind::UseKeyword => self.parse_use_declaration(),
            SyntaxKind::ClassKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::TraitKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::FinalKeyword
            | SyntaxKind::ReadonlyKeyword => self.parse_class_like_declaration(),
            SyntaxKind::FunctionKeyword if self.is_function_declaration_start() => {
                self.parse_function_declaration()
            }
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::ConstKeyword => {
                self.skip_unsupported_statement();
                NodeIndex::NONE
            }
            SyntaxKind::StaticKeyword if !self.next_token_is(SyntaxKind::ColonColonToken) => {
                // `static $counter = 0;`
                self.skip_unsupported_statement();
                NodeIndex::NONE
            }
            SyntaxKind::Identifier if self.is_enum_declaration_start() => {
                self.parse_class_like_declaration()
            }
            SyntaxKind::Identifier if self.is_skipped_statement_word() => {
                self.skip_unsupported_statement();
                NodeIndex::NONE
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `enum Name`; `enum(` is an ordinary call.
    fn is_enum_declaration_start(&mut self) -> bool {
        self.is_identifier_text("enum") && self.next_token_is(SyntaxKind::Identifier)
    }

    fn is_skipped_statement_word(&self) -> bool {
        let text = self.token_text().to_ascii_lowercase();
        SKIPPED_STATEMENT_WORDS.contains(&text.as_str())
    }

    /// Skip a statement outside the supported subset: a balanced token run up
    /// to `;` or to the end of its trailing block.
    pub(crate) fn skip_unsupported_statement(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken => {
                    depth = depth.saturating_sub(1);
                }
                SyntaxKind::CloseBraceToken => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        if self.is_token(SyntaxKind::ElseKeyword)
                            || self.is_token(SyntaxKind::ElseIfKeyword)
                            || SKIPPED_CONTINUATION_WORDS
                                .iter()
                                .any(|word| self.is_identifier_text(word))
                        {
                            continue;
                        }
                        return;
                    }
                }
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::CloseTagToken if depth == 0 => return,
                _ => {}
            }
            self.next_token();
        }
    }

    // =========================================================================
    // Namespaces and imports
    // =========================================================================

    /// `namespace Foo;`, `namespace Foo { ... }` or `namespace { ... }`.
    fn is_namespace_declaration_start(&mut self) -> bool {
        self.is_token(SyntaxKind::NamespaceKeyword)
            && self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::Identifier | SyntaxKind::QualifiedName | SyntaxKind::OpenBraceToken
                )
            })
    }

    fn parse_namespace_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();

        let name = if matches!(
            self.token(),
            SyntaxKind::Identifier | SyntaxKind::QualifiedName
        ) {
            let name = self.token_value().to_string();
            self.next_token();
            Some(name)
        } else {
            None
        };

        let (statements, braced) = if self.parse_optional(SyntaxKind::OpenBraceToken) {
            let statements = self.parse_statement_list(SyntaxKind::CloseBraceToken, false);
            self.parse_expected(SyntaxKind::CloseBraceToken, "}");
            (statements, true)
        } else {
            if name.is_none() {
                self.parse_error_at_current_token("namespace name expected");
            }
            self.parse_semicolon();
            let statements = self.parse_statement_list(SyntaxKind::EndOfFileToken, true);
            (statements, false)
        };

        self.finish_node(
            SyntaxKind::NamespaceDeclaration,
            pos,
            NodeData::Namespace(NamespaceData {
                name,
                statements,
                braced,
            }),
        )
    }

    /// `use A\B;`, `use A\B as C, D;`, `use function f;`, `use A\{B, C as D};`
    fn parse_use_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();

        let kind = if self.parse_optional(SyntaxKind::FunctionKeyword) {
            UseKind::Function
        } else if self.parse_optional(SyntaxKind::ConstKeyword) {
            UseKind::Constant
        } else {
            UseKind::Class
        };

        let mut items = Vec::new();
        loop {
            if !self.token().is_name_token() {
                self.parse_error_at_current_token("name expected");
                break;
            }
            let name = self.token_value().trim_start_matches('\\').to_string();
            self.next_token();

            if self.is_token(SyntaxKind::Unknown) && self.token_text() == "\\" {
                self.next_token();
                self.parse_group_use_items(&name, &mut items);
            } else {
                let alias = self.parse_use_alias();
                items.push(UseItem { name, alias });
            }

            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();

        self.finish_node(
            SyntaxKind::UseDeclaration,
            pos,
            NodeData::Use(UseData { kind, items }),
        )
    }

    fn parse_group_use_items(&mut self, prefix: &str, items: &mut Vec<UseItem>) {
        if !self.parse_expected(SyntaxKind::OpenBraceToken, "{") {
            return;
        }
        while self.token().is_name_token() {
            let name = format!("{prefix}\\{}", self.token_value());
            self.next_token();
            let alias = self.parse_use_alias();
            items.push(UseItem { name, alias });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken, "}");
    }

    fn parse_use_alias(&mut self) -> Option<String> {
        if !self.parse_optional(SyntaxKind::AsKeyword) {
            return None;
        }
        if self.is_token(SyntaxKind::Identifier) {
            let alias = self.token_value().to_string();
            self.next_token();
            Some(alias)
        } else {
            self.parse_error_at_current_token("alias expected");
            None
        }
    }

    // =========================================================================
    // Class-like declarations
    // =========================================================================

    fn parse_modifiers(&mut self) -> ModifierFlags {
        let mut modifiers = ModifierFlags::empty();
        while self.token().is_modifier() {
            // `static::` starts an expression, not a modifier.
            if self.is_token(SyntaxKind::StaticKeyword)
                && self.next_token_is(SyntaxKind::ColonColonToken)
            {
                break;
            }
            modifiers |= ModifierFlags::from_keyword(self.token());
            self.next_token();
        }
        modifiers
    }

    fn parse_class_like_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let doc_comment = self.scanner.take_doc_comment();
        let modifiers = self.parse_modifiers();

        let kind = match self.token() {
            SyntaxKind::ClassKeyword => SyntaxKind::ClassDeclaration,
            SyntaxKind::InterfaceKeyword => SyntaxKind::InterfaceDeclaration,
            SyntaxKind::TraitKeyword => SyntaxKind::TraitDeclaration,
            SyntaxKind::Identifier if self.is_identifier_text("enum") => SyntaxKind::EnumDeclaration,
            _ => {
                self.parse_error_at_current_token("'class' expected");
                return NodeIndex::NONE;
            }
        };
        self.next_token();

        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier_node()
        } else {
            self.parse_error_at_current_token("class name expected");
            NodeIndex::NONE
        };

        // Backing type of `enum Suit: string`.
        if kind == SyntaxKind::EnumDeclaration && self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type();
        }

        let mut extends = NodeList::new();
        let mut implements = NodeList::new();
        if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            if kind == SyntaxKind::InterfaceDeclaration {
                extends = self.parse_name_list();
            } else {
                extends.push(self.parse_name_reference());
            }
        }
        if matches!(kind, SyntaxKind::ClassDeclaration | SyntaxKind::EnumDeclaration)
            && self.parse_optional(SyntaxKind::ImplementsKeyword)
        {
            implements = self.parse_name_list();
        }

        let mut members = NodeList::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken, "{") {
            while !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                let start = self.token_pos();
                self.parse_class_member(&mut members);
                if self.token_pos() == start {
                    self.parse_error_at_current_token("class member expected");
                    self.next_token();
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken, "}");
        }

        self.finish_node(
            kind,
            pos,
            NodeData::ClassLike(ClassLikeData {
                name,
                modifiers,
                extends,
                implements,
                members,
                doc_comment,
            }),
        )
    }

    /// Comma-separated class names.
    fn parse_name_list(&mut self) -> NodeList {
        let mut names = NodeList::new();
        loop {
            names.push(self.parse_name_reference());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        names
    }

    /// A class name reference as a `Name` node.
    pub(crate) fn parse_name_reference(&mut self) -> NodeIndex {
        if !self.token().is_name_token() {
            self.parse_error_at_current_token("class name expected");
            return NodeIndex::NONE;
        }
        let pos = self.token_pos();
        let name = NameData::new(self.token_value());
        self.next_token();
        self.finish_node(SyntaxKind::Name, pos, NodeData::Name(name))
    }

    fn parse_class_member(&mut self, members: &mut NodeList) {
        let pos = self.token_pos();
        let doc_comment = self.scanner.take_doc_comment();

        if self.is_token(SyntaxKind::UseKeyword) {
            members.push(self.parse_trait_use());
            return;
        }
        if self.is_identifier_text("case") {
            members.push(self.parse_enum_case(pos));
            return;
        }

        let modifiers = self.parse_modifiers();
        match self.token() {
            SyntaxKind::ConstKeyword => self.parse_class_constants(pos, modifiers, members),
            SyntaxKind::FunctionKeyword => {
                members.push(self.parse_function_like(
                    SyntaxKind::MethodDeclaration,
                    pos,
                    modifiers,
                    doc_comment,
                ));
            }
            SyntaxKind::SemicolonToken => {
                self.next_token();
            }
            _ if modifiers.is_empty() && !self.starts_type() => {
                self.parse_error_at_current_token("class member expected");
            }
            _ => self.parse_properties(pos, modifiers, doc_comment, members),
        }
    }

    /// `use A, B;` or `use A, B { ... }` inside a class body.
    fn parse_trait_use(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let traits = self.parse_name_list();
        if self.is_token(SyntaxKind::OpenBraceToken) {
            // Conflict resolution rules are kept out of the tree.
            self.skip_unsupported_statement();
        } else {
            self.parse_semicolon();
        }
        self.finish_node(
            SyntaxKind::TraitUse,
            pos,
            NodeData::TraitUse(TraitUseData { traits }),
        )
    }

    /// `case Hearts;` or `case Hearts = 'H';`, kept as a class constant.
    fn parse_enum_case(&mut self, pos: u32) -> NodeIndex {
        self.next_token();
        if !self.is_identifier_or_keyword() {
            self.parse_error_at_current_token("case name expected");
            return NodeIndex::NONE;
        }
        let name = self.token_text().to_string();
        self.next_token();
        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ClassConstant,
            pos,
            NodeData::ClassConstant(ClassConstantData {
                name,
                modifiers: ModifierFlags::PUBLIC,
                value,
            }),
        )
    }

    fn parse_class_constants(&mut self, pos: u32, modifiers: ModifierFlags, members: &mut NodeList) {
        self.next_token();
        // Typed constants: `const int LIMIT = 1;`
        if self.is_identifier_or_keyword()
            && self.look_ahead(|p| {
                let next = p.next_token();
                next == SyntaxKind::Identifier || next.is_keyword()
            })
        {
            self.parse_type();
        }
        loop {
            if !self.is_identifier_or_keyword() {
                self.parse_error_at_current_token("constant name expected");
                return;
            }
            let name = self.token_text().to_string();
            self.next_token();
            self.parse_expected(SyntaxKind::EqualsToken, "=");
            let value = self.parse_expression();
            members.push(self.finish_node(
                SyntaxKind::ClassConstant,
                pos,
                NodeData::ClassConstant(ClassConstantData {
                    name,
                    modifiers,
                    value,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();
    }

    fn parse_properties(
        &mut self,
        pos: u32,
        modifiers: ModifierFlags,
        doc_comment: Option<String>,
        members: &mut NodeList,
    ) {
        let type_annotation = if self.is_token(SyntaxKind::VariableToken) {
            None
        } else {
            self.parse_type()
        };
        loop {
            if !self.is_token(SyntaxKind::VariableToken) {
                self.parse_error_at_current_token("property name expected");
                return;
            }
            let name = self.token_value().to_string();
            self.next_token();
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_expression()
            } else {
                NodeIndex::NONE
            };
            members.push(self.finish_node(
                SyntaxKind::PropertyDeclaration,
                pos,
                NodeData::Property(PropertyData {
                    name,
                    modifiers,
                    type_annotation: type_annotation.clone(),
                    default,
                    doc_comment: doc_comment.clone(),
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();
    }

    // =========================================================================
    // Functions and methods
    // =========================================================================

    /// `function name(` or `function &name(`; anything else is a closure.
    fn is_function_declaration_start(&mut self) -> bool {
        self.look_ahead(|p| {
            let mut next = p.next_token();
            if next == SyntaxKind::AmpersandToken {
                next = p.next_token();
            }
            next == SyntaxKind::Identifier || next.is_keyword()
        })
    }

    fn parse_function_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let doc_comment = self.scanner.take_doc_comment();
        self.parse_function_like(
            SyntaxKind::FunctionDeclaration,
            pos,
            ModifierFlags::empty(),
            doc_comment,
        )
    }

    /// Parse from the `function` keyword to the end of the body.
    fn parse_function_like(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        modifiers: ModifierFlags,
        doc_comment: Option<String>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword, "function");
        let by_ref = self.parse_optional(SyntaxKind::AmpersandToken);

        let name = if self.is_identifier_or_keyword() {
            self.parse_identifier_node()
        } else {
            self.parse_error_at_current_token("function name expected");
            NodeIndex::NONE
        };

        let parameters = self.parse_parameter_list();
        let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            None
        };

        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };

        self.finish_node(
            kind,
            pos,
            NodeData::Function(FunctionData {
                name,
                modifiers,
                by_ref,
                parameters,
                return_type,
                body,
                doc_comment,
            }),
        )
    }

    fn parse_parameter_list(&mut self) -> NodeList {
        let mut parameters = NodeList::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken, "(") {
            return parameters;
        }
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let parameter = self.parse_parameter();
            if parameter.is_none() {
                break;
            }
            parameters.push(parameter);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken, ")");
        parameters
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let promoted = self.parse_modifiers();
        let type_annotation = if matches!(
            self.token(),
            SyntaxKind::AmpersandToken | SyntaxKind::DotDotDotToken | SyntaxKind::VariableToken
        ) {
            None
        } else {
            self.parse_type()
        };
        let by_ref = self.parse_optional(SyntaxKind::AmpersandToken);
        let variadic = self.parse_optional(SyntaxKind::DotDotDotToken);

        if !self.is_token(SyntaxKind::VariableToken) {
            self.parse_error_at_current_token("parameter name expected");
            return NodeIndex::NONE;
        }
        let name = self.token_value().to_string();
        self.next_token();

        let default = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_expression()
        } else {
            NodeIndex::NONE
        };

        self.finish_node(
            SyntaxKind::Parameter,
            pos,
            NodeData::Parameter(ParameterData {
                name,
                type_annotation,
                default,
                by_ref,
                variadic,
                promoted,
            }),
        )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken, "{");
        let statements = self.parse_statement_list(SyntaxKind::CloseBraceToken, false);
        self.parse_expected(SyntaxKind::CloseBraceToken, "}");
        self.finish_node(
            SyntaxKind::Block,
            pos,
            NodeData::Block(BlockData { statements }),
        )
    }

    fn parse_return_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseTagToken)
        {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ReturnStatement,
            pos,
            NodeData::Return(ReturnData { expression }),
        )
    }

    /// `if (...) stmt [elseif (...) stmt]* [else stmt]`. `elseif` branches
    /// become nested `IfStatement` nodes in the else slot.
    fn parse_if_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken, "(");
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken, ")");
        if self.is_token(SyntaxKind::ColonToken) {
            self.parse_error_at_current_token("alternative control syntax is not supported");
        }
        let then_statement = self.parse_statement();

        let else_statement = if self.is_token(SyntaxKind::ElseIfKeyword) {
            self.parse_if_statement()
        } else if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };

        self.finish_node(
            SyntaxKind::IfStatement,
            pos,
            NodeData::If(IfStatementData {
                condition,
                then_statement,
                else_statement,
            }),
        )
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        if expression.is_none() {
            return NodeIndex::NONE;
        }
        self.parse_semicolon();
        self.finish_node(
            SyntaxKind::ExpressionStatement,
            pos,
            NodeData::ExpressionStatement(ExprStatementData { expression }),
        )
    }
}
