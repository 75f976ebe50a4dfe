//! Table-driven scanner required to accept exactly the strings
//! [`super::HandCoded`] accepts and to produce byte-identical tokens.
//!
//! Rather than hand dispatch on each character, recognition of multi-byte
//! lexemes (operators, identifiers, numbers, strings, comments) is driven
//! by a small per-class state machine; the class of single-byte
//! punctuation is still a direct table lookup since no state is needed.

use super::{Scanner, SourceCursor};
use crate::token::{Span, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Equal,
    Plus,
    Minus,
    Slash,
    LineComment,
    BlockComment,
    BlockCommentStar,
    Less,
    Greater,
    Identifier,
    StringLit,
    Number,
    NumberDot,
    NumberFrac,
}

pub struct FiniteAutomaton {
    cursor: SourceCursor,
    error: Option<Token>,
}

impl FiniteAutomaton {
    fn make(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, Span::new(self.cursor.line, self.cursor.token_start, self.cursor.pos))
    }

    fn lexical_error(&mut self, message: String) -> Token {
        let tok = self.make(TokenKind::Error, message);
        if self.error.is_none() {
            self.error = Some(tok.clone());
        }
        tok
    }

    fn skip_whitespace(&mut self) {
        while !self.cursor.is_eof() && (self.cursor.peek() as char).is_whitespace() {
            if self.cursor.expect(b'\n') {
                self.cursor.update_line_count();
            }
            self.cursor.eat();
        }
    }
}

impl Scanner for FiniteAutomaton {
    fn new(source: &str) -> Self {
        FiniteAutomaton {
            cursor: SourceCursor::new(source),
            error: None,
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.cursor.token_start = self.cursor.pos;

        if self.cursor.is_eof() {
            return self.make(TokenKind::EndOfFile, "");
        }

        let mut state = State::Start;
        let mut lexeme = String::new();

        loop {
            let c = self.cursor.peek();
            match state {
                State::Start => match c {
                    b'[' => {
                        self.cursor.eat();
                        return self.make(TokenKind::LeftSquarePr, "[");
                    }
                    b']' => {
                        self.cursor.eat();
                        return self.make(TokenKind::RightSquarePr, "]");
                    }
                    b'{' => {
                        self.cursor.eat();
                        return self.make(TokenKind::LeftCurlyPr, "{");
                    }
                    b'}' => {
                        self.cursor.eat();
                        return self.make(TokenKind::RightCurlyPr, "}");
                    }
                    b'(' => {
                        self.cursor.eat();
                        return self.make(TokenKind::LeftPr, "(");
                    }
                    b')' => {
                        self.cursor.eat();
                        return self.make(TokenKind::RightPr, ")");
                    }
                    b'=' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Equal;
                    }
                    b'+' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Plus;
                    }
                    b'-' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Minus;
                    }
                    b'$' => {
                        self.cursor.eat();
                        return self.make(TokenKind::StringifyOp, "$");
                    }
                    b'?' => {
                        self.cursor.eat();
                        return self.make(TokenKind::BooleanOp, "?");
                    }
                    b'@' => {
                        self.cursor.eat();
                        return self.make(TokenKind::RoundOp, "@");
                    }
                    b'#' => {
                        self.cursor.eat();
                        return self.make(TokenKind::LengthOp, "#");
                    }
                    b'*' => {
                        self.cursor.eat();
                        return self.make(TokenKind::MultOp, "*");
                    }
                    b'/' => {
                        self.cursor.eat();
                        state = State::Slash;
                    }
                    b'%' => {
                        self.cursor.eat();
                        return self.make(TokenKind::ModOp, "%");
                    }
                    b'<' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Less;
                    }
                    b'>' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Greater;
                    }
                    b';' => {
                        self.cursor.eat();
                        return self.make(TokenKind::SemiColonSy, ";");
                    }
                    b':' => {
                        self.cursor.eat();
                        return self.make(TokenKind::ColonSy, ":");
                    }
                    b',' => {
                        self.cursor.eat();
                        return self.make(TokenKind::CommaSy, ",");
                    }
                    b'"' => {
                        self.cursor.eat();
                        state = State::StringLit;
                    }
                    _ if (c as char).is_alphabetic() || c == b'_' => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Identifier;
                    }
                    _ if (c as char).is_ascii_digit() => {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::Number;
                    }
                    _ => {
                        let ch = self.cursor.eat() as char;
                        return self.lexical_error(format!("Unrecognized token: {}", ch));
                    }
                },
                State::Equal => {
                    if self.cursor.expect(b'=') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::IsEqualOp, lexeme);
                    }
                    return self.make(TokenKind::EqualOp, lexeme);
                }
                State::Plus => {
                    if self.cursor.expect(b'+') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::IncrementOp, lexeme);
                    }
                    return self.make(TokenKind::PlusOp, lexeme);
                }
                State::Minus => {
                    if self.cursor.expect(b'-') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::DecrementOp, lexeme);
                    }
                    return self.make(TokenKind::MinusOp, lexeme);
                }
                State::Slash => {
                    if self.cursor.expect(b'/') {
                        self.cursor.eat();
                        state = State::LineComment;
                    } else if self.cursor.expect(b'*') {
                        self.cursor.eat();
                        state = State::BlockComment;
                    } else {
                        return self.make(TokenKind::DivideOp, "/");
                    }
                }
                State::LineComment => {
                    if self.cursor.expect(b'\n') || self.cursor.is_eof() {
                        self.cursor.update_line_count();
                        self.cursor.eat();
                        return self.next_token();
                    }
                    self.cursor.eat();
                }
                State::BlockComment => {
                    if self.cursor.is_eof() {
                        self.cursor.eat();
                        return self.next_token();
                    }
                    if self.cursor.expect(b'\n') {
                        self.cursor.update_line_count();
                    }
                    if self.cursor.expect(b'*') {
                        self.cursor.eat();
                        state = State::BlockCommentStar;
                    } else {
                        self.cursor.eat();
                    }
                }
                State::BlockCommentStar => {
                    if self.cursor.expect(b'/') {
                        self.cursor.eat();
                        return self.next_token();
                    }
                    state = State::BlockComment;
                }
                State::Less => {
                    if self.cursor.expect(b'>') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::NotEqualOp, lexeme);
                    } else if self.cursor.expect(b'=') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::LessEqualOp, lexeme);
                    }
                    return self.make(TokenKind::LessThanOp, lexeme);
                }
                State::Greater => {
                    if self.cursor.expect(b'=') {
                        lexeme.push(self.cursor.eat() as char);
                        return self.make(TokenKind::GreaterEqualOp, lexeme);
                    }
                    return self.make(TokenKind::GreaterThanOp, lexeme);
                }
                State::Identifier => {
                    if !self.cursor.is_eof()
                        && ((self.cursor.peek() as char).is_alphanumeric() || self.cursor.expect(b'_'))
                    {
                        lexeme.push(self.cursor.eat() as char);
                    } else {
                        let kind = TokenKind::keyword_or_identifier(&lexeme);
                        return self.make(kind, lexeme);
                    }
                }
                State::StringLit => {
                    if self.cursor.is_eof() {
                        return self.lexical_error(format!("Unclosed string literal: {}", lexeme));
                    }
                    if self.cursor.expect(b'"') {
                        self.cursor.eat();
                        return self.make(TokenKind::StringSy, lexeme);
                    }
                    lexeme.push(self.cursor.eat() as char);
                }
                State::Number => {
                    if !self.cursor.is_eof() && (self.cursor.peek() as char).is_ascii_digit() {
                        lexeme.push(self.cursor.eat() as char);
                    } else if !self.cursor.is_eof() && self.cursor.expect(b'.') {
                        lexeme.push(self.cursor.eat() as char);
                        state = State::NumberDot;
                    } else {
                        return self.make(TokenKind::IntegerNum, lexeme);
                    }
                }
                State::NumberDot => {
                    if !(self.cursor.peek() as char).is_ascii_digit() {
                        return self.lexical_error(format!(
                            "Invalid floating point number {}",
                            lexeme
                        ));
                    }
                    state = State::NumberFrac;
                }
                State::NumberFrac => {
                    if !self.cursor.is_eof() && (self.cursor.peek() as char).is_ascii_digit() {
                        lexeme.push(self.cursor.eat() as char);
                    } else {
                        return self.make(TokenKind::FloatNum, lexeme);
                    }
                }
            }
        }
    }

    fn tokenize_all(&mut self) -> Vec<Token> {
        let saved_pos = self.cursor.pos;
        let saved_line = self.cursor.line;
        let saved_token_start = self.cursor.token_start;

        self.cursor.pos = 0;
        self.cursor.line = 1;
        self.cursor.token_start = 0;
        self.error = None;

        let mut stream = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.is_eof();
            if tok.is_error() && self.error.is_none() {
                self.error = Some(tok.clone());
            }
            stream.push(tok);
            if is_eof {
                break;
            }
        }

        self.cursor.pos = saved_pos;
        self.cursor.line = saved_line;
        self.cursor.token_start = saved_token_start;
        stream
    }

    fn checkpoint(&self) -> usize {
        self.cursor.pos
    }

    fn restore(&mut self, checkpoint: usize) {
        self.cursor.pos = checkpoint;
    }

    fn last_error(&self) -> Option<&Token> {
        self.error.as_ref()
    }

    fn reset(&mut self) {
        self.cursor = SourceCursor::new(&String::from_utf8_lossy(&self.cursor.source));
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::HandCoded;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut sc = FiniteAutomaton::new(src);
        sc.tokenize_all().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        assert_eq!(
            kinds("program foo"),
            vec![TokenKind::ProgramKw, TokenKind::IdSy, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn scans_two_char_operators_greedily() {
        assert_eq!(
            kinds("== <> <= >= ++ --"),
            vec![
                TokenKind::IsEqualOp,
                TokenKind::NotEqualOp,
                TokenKind::LessEqualOp,
                TokenKind::GreaterEqualOp,
                TokenKind::IncrementOp,
                TokenKind::DecrementOp,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn unclosed_string_is_lexical_error() {
        let mut sc = FiniteAutomaton::new("\"abc");
        let stream = sc.tokenize_all();
        assert!(stream[0].is_error());
        assert_eq!(stream[0].lexeme, "Unclosed string literal: abc");
    }

    /// Scanner parity (spec §8): both scanners must agree on every token
    /// for the same input, including comments, numbers, and strings.
    #[test]
    fn agrees_with_hand_coded_scanner() {
        let samples = [
            "program demo is begin var x : integer = 1; write(x); end",
            "func integer add has var x : integer; var y : integer; begin return x + y; end func",
            "// comment\n1.5 /* block */ \"str\" <> <= >= ++ --",
            "if x then y else z",
            "`",
            "\"unterminated",
            "1.x",
        ];
        for src in samples {
            let mut fa = FiniteAutomaton::new(src);
            let mut hc = HandCoded::new(src);
            assert_eq!(fa.tokenize_all(), hc.tokenize_all(), "mismatch for {:?}", src);
        }
    }
}
