//! Parser state - expression parsing methods.
//!
//! Precedence climbing over the binary operators, with assignment and the
//! conditional operator handled above it and unary/postfix forms below.

use crate::base::{NodeIndex, NodeList};
use crate::node::*;
use crate::state::ParserState;
use phz_scanner::SyntaxKind;

/// Casts written as `(int)`, `(string)`, ...
const CAST_TYPES: &[&str] = &[
    "array", "binary", "bool", "boolean", "double", "float", "int", "integer", "object",
    "string", "unset",
];

const COMPOUND_ASSIGNMENTS: &[&str] = &[
    "+=", "-=", "*=", "/=", ".=", "%=", "**=", "??=", "|=", "&=", "^=", "<<=", ">>=",
];

const PREFIX_OPERATORS: &[&str] = &["!", "-", "+", "~", "@", "++", "--"];

/// Binary operator precedence; higher binds tighter.
fn binary_precedence(operator: &str) -> Option<u8> {
    let precedence = match operator {
        "or" => 1,
        "xor" => 2,
        "and" => 3,
        "??" => 5,
        "||" => 6,
        "&&" => 7,
        "|" => 8,
        "^" => 9,
        "&" => 10,
        "==" | "!=" | "===" | "!==" | "<>" | "<=>" => 11,
        "<" | "<=" | ">" | ">=" => 12,
        "." => 13,
        "<<" | ">>" => 14,
        "+" | "-" => 15,
        "*" | "/" | "%" => 16,
        "instanceof" => 18,
        "**" => 19,
        _ => return None,
    };
    Some(precedence)
}

fn is_right_associative(operator: &str) -> bool {
    matches!(operator, "??" | "**")
}

impl ParserState {
    /// Parse an expression. Returns `NONE` after reporting an error.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        if !self.enter_nested() {
            self.exit_nested();
            return NodeIndex::NONE;
        }
        let expression = self.parse_assignment_expression();
        self.exit_nested();
        expression
    }

    fn parse_assignment_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let target = self.parse_conditional_expression();
        if target.is_none() {
            return target;
        }

        if self.parse_optional(SyntaxKind::EqualsToken) {
            let by_ref = self.parse_optional(SyntaxKind::AmpersandToken);
            let value = self.parse_expression();
            return self.finish_node(
                SyntaxKind::AssignExpression,
                pos,
                NodeData::Assign(AssignData {
                    target,
                    value,
                    by_ref,
                }),
            );
        }

        if self.is_token(SyntaxKind::OperatorToken)
            && COMPOUND_ASSIGNMENTS.contains(&self.token_value())
        {
            let operator = self.token_value().to_string();
            self.next_token();
            let right = self.parse_expression();
            return self.finish_node(
                SyntaxKind::BinaryExpression,
                pos,
                NodeData::Binary(BinaryExprData {
                    left: target,
                    operator,
                    right,
                }),
            );
        }

        target
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if condition.is_none() || !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }

        let when_true = if self.is_token(SyntaxKind::ColonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::ColonToken, ":");
        let when_false = self.parse_expression();
        self.finish_node(
            SyntaxKind::ConditionalExpression,
            pos,
            NodeData::Conditional(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
        )
    }

    /// Spelling of the current token as a binary operator, if it is one.
    fn current_binary_operator(&self) -> Option<String> {
        let text = match self.token() {
            SyntaxKind::OperatorToken => self.token_value().to_string(),
            SyntaxKind::BarToken => "|".to_string(),
            SyntaxKind::AmpersandToken => "&".to_string(),
            SyntaxKind::Identifier => self.token_text().to_ascii_lowercase(),
            _ => return None,
        };
        binary_precedence(&text).map(|_| text)
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        if left.is_none() {
            return left;
        }

        while let Some(operator) = self.current_binary_operator() {
            let Some(precedence) = binary_precedence(&operator) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.next_token();

            let right = if operator == "instanceof" {
                self.parse_class_reference()
            } else {
                let next_min = if is_right_associative(&operator) {
                    precedence
                } else {
                    precedence + 1
                };
                self.parse_binary_expression(next_min)
            };
            if right.is_none() {
                return NodeIndex::NONE;
            }

            left = self.finish_node(
                SyntaxKind::BinaryExpression,
                pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator,
                    right,
                }),
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();

        if self.is_token(SyntaxKind::OperatorToken)
            && PREFIX_OPERATORS.contains(&self.token_value())
        {
            let operator = self.token_value().to_string();
            self.next_token();
            return self.finish_unary(pos, operator, true);
        }

        if self.is_identifier_text("clone") || self.is_identifier_text("print") {
            let operator = self.token_text().to_ascii_lowercase();
            self.next_token();
            return self.finish_unary(pos, operator, true);
        }

        if self.is_cast() {
            self.next_token();
            let operator = format!("({})", self.token_text().to_ascii_lowercase());
            self.next_token();
            self.next_token();
            return self.finish_unary(pos, operator, true);
        }

        let primary = self.parse_primary_expression();
        if primary.is_none() {
            return primary;
        }
        self.parse_postfix_expression(pos, primary)
    }

    fn finish_unary(&mut self, pos: u32, operator: String, prefix: bool) -> NodeIndex {
        let operand = self.parse_unary_expression();
        if operand.is_none() {
            return NodeIndex::NONE;
        }
        self.finish_node(
            SyntaxKind::UnaryExpression,
            pos,
            NodeData::Unary(UnaryExprData {
                operator,
                operand,
                prefix,
            }),
        )
    }

    fn is_cast(&mut self) -> bool {
        self.is_token(SyntaxKind::OpenParenToken)
            && self.look_ahead(|p| {
                p.next_token() == SyntaxKind::Identifier
                    && CAST_TYPES.contains(&p.token_text().to_ascii_lowercase().as_str())
                    && p.next_token() == SyntaxKind::CloseParenToken
            })
    }

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::VariableToken => {
                let name = self.token_value().to_string();
                self.next_token();
                self.finish_node(
                    SyntaxKind::Variable,
                    pos,
                    NodeData::Variable(VariableData {
                        name: Some(name),
                        expression: NodeIndex::NONE,
                    }),
                )
            }
            SyntaxKind::DollarToken => self.parse_variable_variable(),
            SyntaxKind::Identifier
                if self.is_identifier_text("array")
                    && self.next_token_is(SyntaxKind::OpenParenToken) =>
            {
                self.next_token();
                self.parse_array_literal(SyntaxKind::CloseParenToken, ")")
            }
            SyntaxKind::FunctionKeyword => self.skip_unsupported_expression(pos),
            SyntaxKind::Identifier if self.is_arrow_function_or_match_start() => {
                self.skip_unsupported_expression(pos)
            }
            kind if kind.is_name_token() => self.parse_name_reference(),
            SyntaxKind::StaticKeyword
                if self.look_ahead(|p| {
                    p.next_token() == SyntaxKind::FunctionKeyword || p.is_identifier_text("fn")
                }) =>
            {
                self.skip_unsupported_expression(pos)
            }
            SyntaxKind::StaticKeyword => {
                self.next_token();
                self.finish_node(
                    SyntaxKind::Name,
                    pos,
                    NodeData::Name(NameData::new("static")),
                )
            }
            SyntaxKind::StringLiteral => {
                let value = self.token_value().to_string();
                self.next_token();
                self.finish_node(
                    SyntaxKind::StringLiteralExpression,
                    pos,
                    NodeData::Literal(LiteralData { value }),
                )
            }
            SyntaxKind::NumericLiteral => {
                let value = self.token_value().to_string();
                self.next_token();
                self.finish_node(
                    SyntaxKind::NumericLiteralExpression,
                    pos,
                    NodeData::Literal(LiteralData { value }),
                )
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_expression();
                self.parse_expected(SyntaxKind::CloseParenToken, ")");
                self.finish_node(
                    SyntaxKind::ParenthesizedExpression,
                    pos,
                    NodeData::Parenthesized(ParenthesizedData { expression }),
                )
            }
            SyntaxKind::OpenBracketToken => {
                self.parse_array_literal(SyntaxKind::CloseBracketToken, "]")
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(),
            _ => {
                self.parse_error_at_current_token("expression expected");
                NodeIndex::NONE
            }
        }
    }

    /// `fn(...) =>` or `match (...)`.
    fn is_arrow_function_or_match_start(&mut self) -> bool {
        if self.is_identifier_text("fn") {
            return self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::AmpersandToken
                )
            });
        }
        self.is_identifier_text("match") && self.next_token_is(SyntaxKind::OpenParenToken)
    }

    /// Consume a closure, arrow function, `match` or anonymous class as a
    /// balanced token run ending before the `;`, `,` or closing bracket that
    /// follows it.
    fn skip_unsupported_expression(&mut self, pos: u32) -> NodeIndex {
        let mut depth = 0usize;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                SyntaxKind::SemicolonToken | SyntaxKind::CommaToken | SyntaxKind::CloseTagToken
                    if depth == 0 =>
                {
                    break;
                }
                _ => {}
            }
            self.next_token();
        }
        self.finish_node(SyntaxKind::SkippedExpression, pos, NodeData::None)
    }

    /// `$$name` or `${expr}`.
    fn parse_variable_variable(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.parse_optional(SyntaxKind::OpenBraceToken) {
            let expression = self.parse_expression();
            self.parse_expected(SyntaxKind::CloseBraceToken, "}");
            expression
        } else {
            self.parse_primary_expression()
        };
        self.finish_node(
            SyntaxKind::Variable,
            pos,
            NodeData::Variable(VariableData {
                name: None,
                expression,
            }),
        )
    }

    /// `[...]` or `array(...)`, with the opening token as the current token.
    fn parse_array_literal(&mut self, closing: SyntaxKind, closing_text: &str) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut keys = Vec::new();
        let mut values = NodeList::new();
        while !self.is_token(closing) && !self.is_token(SyntaxKind::EndOfFileToken) {
            if self.is_token(SyntaxKind::CommaToken) {
                // Skipped slot in list destructuring.
                self.next_token();
                continue;
            }
            self.parse_optional(SyntaxKind::DotDotDotToken);
            self.parse_optional(SyntaxKind::AmpersandToken);
            let first = self.parse_expression();
            if first.is_none() {
                break;
            }
            if self.parse_optional(SyntaxKind::EqualsGreaterThanToken) {
                self.parse_optional(SyntaxKind::AmpersandToken);
                keys.push(first);
                values.push(self.parse_expression());
            } else {
                keys.push(NodeIndex::NONE);
                values.push(first);
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(closing, closing_text);
        self.finish_node(
            SyntaxKind::ArrayLiteral,
            pos,
            NodeData::ArrayLiteral(ArrayLiteralData { keys, values }),
        )
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        if self.is_token(SyntaxKind::ClassKeyword) {
            return self.skip_unsupported_expression(pos);
        }
        let class = self.parse_class_reference();
        if class.is_none() {
            return class;
        }
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments()
        } else {
            NodeList::new()
        };
        self.finish_node(
            SyntaxKind::NewExpression,
            pos,
            NodeData::New(NewData { class, arguments }),
        )
    }

    /// Class position of `new` and `instanceof`: a name, `static`, a variable
    /// or a parenthesized expression.
    fn parse_class_reference(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::VariableToken
            | SyntaxKind::DollarToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::StaticKeyword => self.parse_primary_expression(),
            kind if kind.is_name_token() => self.parse_name_reference(),
            _ => {
                self.parse_error_at_current_token("class name expected");
                NodeIndex::NONE
            }
        }
    }

    fn parse_postfix_expression(&mut self, pos: u32, mut expression: NodeIndex) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::MinusGreaterThanToken | SyntaxKind::QuestionMinusGreaterThanToken => {
                    let nullsafe = self.is_token(SyntaxKind::QuestionMinusGreaterThanToken);
                    self.next_token();
                    let name = self.parse_member_name();
                    if name.is_none() {
                        return NodeIndex::NONE;
                    }
                    expression = if self.is_token(SyntaxKind::OpenParenToken) {
                        let arguments = self.parse_arguments();
                        self.finish_node(
                            SyntaxKind::MethodCall,
                            pos,
                            NodeData::Call(CallData {
                                target: expression,
                                name,
                                arguments,
                                nullsafe,
                            }),
                        )
                    } else {
                        self.finish_node(
                            SyntaxKind::PropertyFetch,
                            pos,
                            NodeData::Access(AccessData {
                                target: expression,
                                name,
                                nullsafe,
                            }),
                        )
                    };
                }
                SyntaxKind::ColonColonToken => {
                    self.next_token();
                    let is_property = self.is_token(SyntaxKind::VariableToken);
                    let name = self.parse_member_name();
                    if name.is_none() {
                        return NodeIndex::NONE;
                    }
                    expression = if !is_property && self.is_token(SyntaxKind::OpenParenToken) {
                        let arguments = self.parse_arguments();
                        self.finish_node(
                            SyntaxKind::StaticCall,
                            pos,
                            NodeData::Call(CallData {
                                target: expression,
                                name,
                                arguments,
                                nullsafe: false,
                            }),
                        )
                    } else {
                        let kind = if is_property {
                            SyntaxKind::PropertyFetch
                        } else {
                            SyntaxKind::ClassConstantFetch
                        };
                        self.finish_node(
                            kind,
                            pos,
                            NodeData::Access(AccessData {
                                target: expression,
                                name,
                                nullsafe: false,
                            }),
                        )
                    };
                }
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_arguments();
                    expression = self.finish_node(
                        SyntaxKind::FunctionCall,
                        pos,
                        NodeData::Call(CallData {
                            target: expression,
                            name: NodeIndex::NONE,
                            arguments,
                            nullsafe: false,
                        }),
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let index = if self.is_token(SyntaxKind::CloseBracketToken) {
                        NodeIndex::NONE
                    } else {
                        self.parse_expression()
                    };
                    self.parse_expected(SyntaxKind::CloseBracketToken, "]");
                    expression = self.finish_node(
                        SyntaxKind::ElementAccessExpression,
                        pos,
                        NodeData::Access(AccessData {
                            target: expression,
                            name: index,
                            nullsafe: false,
                        }),
                    );
                }
                SyntaxKind::OperatorToken if matches!(self.token_value(), "++" | "--") => {
                    let operator = self.token_value().to_string();
                    self.next_token();
                    expression = self.finish_node(
                        SyntaxKind::UnaryExpression,
                        pos,
                        NodeData::Unary(UnaryExprData {
                            operator,
                            operand: expression,
                            prefix: false,
                        }),
                    );
                }
                _ => return expression,
            }
        }
    }

    /// Member name after `->` or `::`: an identifier (keywords allowed), a
    /// variable, or `{expr}`.
    fn parse_member_name(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            return self.parse_identifier_node();
        }
        match self.token() {
            SyntaxKind::VariableToken | SyntaxKind::DollarToken => self.parse_primary_expression(),
            SyntaxKind::OpenBraceToken => {
                self.next_token();
                let expression = self.parse_expression();
                self.parse_expected(SyntaxKind::CloseBraceToken, "}");
                expression
            }
            _ => {
                self.parse_error_at_current_token("member name expected");
                NodeIndex::NONE
            }
        }
    }

    /// `(a, ...$rest, name: b)`; `(...)` creates a first-class callable.
    fn parse_arguments(&mut self) -> NodeList {
        let mut arguments = NodeList::new();
        self.parse_expected(SyntaxKind::OpenParenToken, "(");
        if self.is_token(SyntaxKind::DotDotDotToken)
            && self.next_token_is(SyntaxKind::CloseParenToken)
        {
            self.next_token();
            self.next_token();
            return arguments;
        }
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_identifier_or_keyword() && self.next_token_is(SyntaxKind::ColonToken) {
                // Named argument; the name is not kept.
                self.next_token();
                self.next_token();
            }
            self.parse_optional(SyntaxKind::DotDotDotToken);
            let argument = self.parse_expression();
            if argument.is_none() {
                break;
            }
            arguments.push(argument);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken, ")");
        arguments
    }
}
