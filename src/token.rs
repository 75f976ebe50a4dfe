//! The token model shared by both scanners.
//!
//! `TokenKind::wire_name` (and the `Display` impl built on it) produces the
//! upper-snake wire names of the original grammar (`FUNC_KW`,
//! `LEFT_SQUARE_PR`, `INCREMENT_OP`, ...) so diagnostics and golden-file
//! tests can print tokens the way the original scanner does. `Debug` still
//! prints the plain Rust variant name.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    FuncKw,
    HasKw,
    BeginKw,
    EndKw,
    ProgramKw,
    IsKw,
    VarKw,
    SkipKw,
    StopKw,
    ReadKw,
    WriteKw,
    ForKw,
    DoKw,
    WhileKw,
    IfKw,
    ThenKw,
    ElseKw,
    ReturnKw,
    OrKw,
    AndKw,
    TrueKw,
    FalseKw,
    NotKw,
    // Types
    VoidTy,
    IntegerTy,
    BooleanTy,
    StringTy,
    FloatTy,
    // Numbers
    IntegerNum,
    FloatNum,
    // Operators
    EqualOp,
    PlusOp,
    MinusOp,
    IncrementOp,
    DecrementOp,
    MultOp,
    DivideOp,
    ModOp,
    LessEqualOp,
    LessThanOp,
    IsEqualOp,
    GreaterThanOp,
    GreaterEqualOp,
    NotEqualOp,
    StringifyOp,
    BooleanOp,
    RoundOp,
    LengthOp,
    // Brackets
    LeftSquarePr,
    RightSquarePr,
    LeftCurlyPr,
    RightCurlyPr,
    LeftPr,
    RightPr,
    // Symbols
    SemiColonSy,
    ColonSy,
    CommaSy,
    IdSy,
    StringSy,
    // Others
    Error,
    EndOfFile,
}

impl TokenKind {
    /// Reserved words recognized by `check_reserved`, in source order.
    pub const KEYWORDS: &'static [(&'static str, TokenKind)] = &[
        ("func", TokenKind::FuncKw),
        ("has", TokenKind::HasKw),
        ("begin", TokenKind::BeginKw),
        ("end", TokenKind::EndKw),
        ("program", TokenKind::ProgramKw),
        ("is", TokenKind::IsKw),
        ("var", TokenKind::VarKw),
        ("skip", TokenKind::SkipKw),
        ("stop", TokenKind::StopKw),
        ("read", TokenKind::ReadKw),
        ("write", TokenKind::WriteKw),
        ("for", TokenKind::ForKw),
        ("do", TokenKind::DoKw),
        ("while", TokenKind::WhileKw),
        ("if", TokenKind::IfKw),
        ("then", TokenKind::ThenKw),
        ("else", TokenKind::ElseKw),
        ("return", TokenKind::ReturnKw),
        ("or", TokenKind::OrKw),
        ("and", TokenKind::AndKw),
        ("true", TokenKind::TrueKw),
        ("false", TokenKind::FalseKw),
        ("not", TokenKind::NotKw),
        ("void", TokenKind::VoidTy),
        ("integer", TokenKind::IntegerTy),
        ("boolean", TokenKind::BooleanTy),
        ("string", TokenKind::StringTy),
        ("float", TokenKind::FloatTy),
    ];

    /// Looks up `word` in the reserved-word table, falling back to
    /// `IdSy` when it isn't one.
    pub fn keyword_or_identifier(word: &str) -> TokenKind {
        Self::KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::IdSy)
    }

    pub fn is_keyword(self) -> bool {
        Self::KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    /// The upper-snake wire name used by diagnostics (`FUNC_KW`,
    /// `LEFT_SQUARE_PR`, `INCREMENT_OP`, ...), matching the original
    /// scanner's token-type names.
    pub fn wire_name(self) -> &'static str {
        match self {
            TokenKind::FuncKw => "FUNC_KW",
            TokenKind::HasKw => "HAS_KW",
            TokenKind::BeginKw => "BEGIN_KW",
            TokenKind::EndKw => "END_KW",
            TokenKind::ProgramKw => "PROGRAM_KW",
            TokenKind::IsKw => "IS_KW",
            TokenKind::VarKw => "VAR_KW",
            TokenKind::SkipKw => "SKIP_KW",
            TokenKind::StopKw => "STOP_KW",
            TokenKind::ReadKw => "READ_KW",
            TokenKind::WriteKw => "WRITE_KW",
            TokenKind::ForKw => "FOR_KW",
            TokenKind::DoKw => "DO_KW",
            TokenKind::WhileKw => "WHILE_KW",
            TokenKind::IfKw => "IF_KW",
            TokenKind::ThenKw => "THEN_KW",
            TokenKind::ElseKw => "ELSE_KW",
            TokenKind::ReturnKw => "RETURN_KW",
            TokenKind::OrKw => "OR_KW",
            TokenKind::AndKw => "AND_KW",
            TokenKind::TrueKw => "TRUE_KW",
            TokenKind::FalseKw => "FALSE_KW",
            TokenKind::NotKw => "NOT_KW",
            TokenKind::VoidTy => "VOID_TY",
            TokenKind::IntegerTy => "INTEGER_TY",
            TokenKind::BooleanTy => "BOOLEAN_TY",
            TokenKind::StringTy => "STRING_TY",
            TokenKind::FloatTy => "FLOAT_TY",
            TokenKind::IntegerNum => "INTEGER_NUM",
            TokenKind::FloatNum => "FLOAT_NUM",
            TokenKind::EqualOp => "EQUAL_OP",
            TokenKind::PlusOp => "PLUS_OP",
            TokenKind::MinusOp => "MINUS_OP",
            TokenKind::IncrementOp => "INCREMENT_OP",
            TokenKind::DecrementOp => "DECREMENT_OP",
            TokenKind::MultOp => "MULT_OP",
            TokenKind::DivideOp => "DIVIDE_OP",
            TokenKind::ModOp => "MOD_OP",
            TokenKind::LessEqualOp => "LESS_EQUAL_OP",
            TokenKind::LessThanOp => "LESS_THAN_OP",
            TokenKind::IsEqualOp => "IS_EQUAL_OP",
            TokenKind::GreaterThanOp => "GREATER_THAN_OP",
            TokenKind::GreaterEqualOp => "GREATER_EQUAL_OP",
            TokenKind::NotEqualOp => "NOT_EQUAL_OP",
            TokenKind::StringifyOp => "STRINGIFY_OP",
            TokenKind::BooleanOp => "BOOLEAN_OP",
            TokenKind::RoundOp => "ROUND_OP",
            TokenKind::LengthOp => "LENGTH_OP",
            TokenKind::LeftSquarePr => "LEFT_SQUARE_PR",
            TokenKind::RightSquarePr => "RIGHT_SQUARE_PR",
            TokenKind::LeftCurlyPr => "LEFT_CURLY_PR",
            TokenKind::RightCurlyPr => "RIGHT_CURLY_PR",
            TokenKind::LeftPr => "LEFT_PR",
            TokenKind::RightPr => "RIGHT_PR",
            TokenKind::SemiColonSy => "SEMI_COLON_SY",
            TokenKind::ColonSy => "COLON_SY",
            TokenKind::CommaSy => "COMMA_SY",
            TokenKind::IdSy => "ID_SY",
            TokenKind::StringSy => "STRING_SY",
            TokenKind::Error => "ERROR",
            TokenKind::EndOfFile => "END_OF_FILE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Half-open byte range `[start, end)` on a single source line.
///
/// `line` is 1-based; `start`/`end` are 0-based byte offsets into the
/// source. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Span { line, start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            line: self.line.min(other.line),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_stores_positions() {
        let span = Span::new(3, 10, 14);
        assert_eq!(span.line, 3);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 14);
    }

    #[test]
    fn span_default_is_zeroed() {
        let span = Span::default();
        assert_eq!(span, Span::new(0, 0, 0));
    }

    #[test]
    fn span_merge_takes_outer_bounds() {
        let a = Span::new(2, 5, 10);
        let b = Span::new(1, 2, 7);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(1, 2, 10));
    }

    #[test]
    fn keyword_lookup_matches_reserved_words() {
        assert_eq!(TokenKind::keyword_or_identifier("while"), TokenKind::WhileKw);
        assert_eq!(TokenKind::keyword_or_identifier("integer"), TokenKind::IntegerTy);
        assert_eq!(
            TokenKind::keyword_or_identifier("not_a_keyword"),
            TokenKind::IdSy
        );
    }

    #[test]
    fn display_names_are_upper_snake_wire_form() {
        assert_eq!(TokenKind::LeftSquarePr.wire_name(), "LEFT_SQUARE_PR");
        assert_eq!(format!("{}", TokenKind::IncrementOp), "INCREMENT_OP");
        assert_eq!(format!("{}", TokenKind::FuncKw), "FUNC_KW");
    }

    #[test]
    fn token_eof_and_error_predicates() {
        let eof = Token::new(TokenKind::EndOfFile, "", Span::default());
        assert!(eof.is_eof());
        assert!(!eof.is_error());

        let err = Token::new(TokenKind::Error, "@", Span::default());
        assert!(err.is_error());
    }
}
