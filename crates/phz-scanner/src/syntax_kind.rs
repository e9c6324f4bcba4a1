//! Token and node kinds.
//!
//! Token kinds come first, keyword kinds are grouped between
//! `FIRST_KEYWORD` and `LAST_KEYWORD`, node kinds follow.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,
    InlineHtml,
    OpenTagToken,
    CloseTagToken,

    // Literals and names
    VariableToken,
    Identifier,
    QualifiedName,
    FullyQualifiedName,
    StringLiteral,
    NumericLiteral,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    ColonToken,
    ColonColonToken,
    MinusGreaterThanToken,
    QuestionMinusGreaterThanToken,
    EqualsGreaterThanToken,
    QuestionToken,
    BarToken,
    AmpersandToken,
    EqualsToken,
    DotDotDotToken,
    DollarToken,
    /// Any other operator (`+`, `===`, `??`, `.`, `!`, ...). The text is kept.
    OperatorToken,

    // Keywords (case-insensitive in PHP)
    AbstractKeyword,
    AsKeyword,
    ClassKeyword,
    ConstKeyword,
    ElseKeyword,
    ElseIfKeyword,
    ExtendsKeyword,
    FinalKeyword,
    FunctionKeyword,
    IfKeyword,
    ImplementsKeyword,
    InterfaceKeyword,
    NamespaceKeyword,
    NewKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReadonlyKeyword,
    ReturnKeyword,
    StaticKeyword,
    TraitKeyword,
    UseKeyword,
    VarKeyword,

    // Nodes
    SourceFile,
    InlineHtmlStatement,
    NamespaceDeclaration,
    UseDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TraitDeclaration,
    EnumDeclaration,
    TraitUse,
    ClassConstant,
    PropertyDeclaration,
    MethodDeclaration,
    FunctionDeclaration,
    Parameter,
    Block,
    ReturnStatement,
    ExpressionStatement,
    IfStatement,
    AssignExpression,
    BinaryExpression,
    UnaryExpression,
    ConditionalExpression,
    MethodCall,
    StaticCall,
    FunctionCall,
    PropertyFetch,
    ClassConstantFetch,
    ElementAccessExpression,
    NewExpression,
    ArrayLiteral,
    ParenthesizedExpression,
    Variable,
    Name,
    StringLiteralExpression,
    NumericLiteralExpression,
    /// Closure, arrow function, `match` or anonymous class kept as an opaque span.
    SkippedExpression,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AbstractKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::VarKeyword;

    /// Look up a keyword by its (case-insensitive) spelling.
    pub fn keyword_from_str(text: &str) -> Option<SyntaxKind> {
        let kind = match text.to_ascii_lowercase().as_str() {
            "abstract" => SyntaxKind::AbstractKeyword,
            "as" => SyntaxKind::AsKeyword,
            "class" => SyntaxKind::ClassKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "else" => SyntaxKind::ElseKeyword,
            "elseif" => SyntaxKind::ElseIfKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "final" => SyntaxKind::FinalKeyword,
            "function" => SyntaxKind::FunctionKeyword,
            "if" => SyntaxKind::IfKeyword,
            "implements" => SyntaxKind::ImplementsKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "namespace" => SyntaxKind::NamespaceKeyword,
            "new" => SyntaxKind::NewKeyword,
            "private" => SyntaxKind::PrivateKeyword,
            "protected" => SyntaxKind::ProtectedKeyword,
            "public" => SyntaxKind::PublicKeyword,
            "readonly" => SyntaxKind::ReadonlyKeyword,
            "return" => SyntaxKind::ReturnKeyword,
            "static" => SyntaxKind::StaticKeyword,
            "trait" => SyntaxKind::TraitKeyword,
            "use" => SyntaxKind::UseKeyword,
            "var" => SyntaxKind::VarKeyword,
            _ => return None,
        };
        Some(kind)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::FIRST_KEYWORD && self <= SyntaxKind::LAST_KEYWORD
    }

    /// Modifiers allowed in front of class members and class declarations.
    #[inline]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::AbstractKeyword
                | SyntaxKind::FinalKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::VarKeyword
        )
    }

    /// Class, interface, trait or enum declaration.
    #[inline]
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::TraitDeclaration
                | SyntaxKind::EnumDeclaration
        )
    }

    /// Any name token (`Foo`, `Foo\Bar`, `\Foo\Bar`).
    #[inline]
    pub fn is_name_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::Identifier | SyntaxKind::QualifiedName | SyntaxKind::FullyQualifiedName
        )
    }
}
