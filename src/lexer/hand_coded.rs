//! Direct character-dispatch scanner, ported from
//! `original_source/src/robin/lexical/handcoded_scanner.cpp`.

use super::{Scanner, SourceCursor};
use crate::token::{Span, Token, TokenKind};

pub struct HandCoded {
    cursor: SourceCursor,
    error: Option<Token>,
}

impl HandCoded {
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
}

impl Scanner for HandCoded {
    fn new(source: &str) -> Self {
        HandCoded {
            cursor: SourceCursor::new(source),
            error: None,
        }
    }

    fn next_token(&mut self) -> Token {
        while !self.cursor.is_eof() && (self.cursor.peek() as char).is_whitespace() {
            if self.cursor.expect(b'\n') {
                self.cursor.update_line_count();
            }
            self.cursor.eat();
        }

        self.cursor.token_start = self.cursor.pos;

        if self.cursor.is_eof() {
            return self.make(TokenKind::EndOfFile, "");
        }

        macro_rules! single {
            ($ch:expr, $kind:expr) => {
                if self.cursor.expect($ch) {
                    self.cursor.eat();
                    return self.make($kind, ($ch as char).to_string());
                }
            };
        }

        single!(b'[', TokenKind::LeftSquarePr);
        single!(b']', TokenKind::RightSquarePr);
        single!(b'{', TokenKind::LeftCurlyPr);
        single!(b'}', TokenKind::RightCurlyPr);
        single!(b'(', TokenKind::LeftPr);
        single!(b')', TokenKind::RightPr);

        if self.cursor.expect(b'=') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            if self.cursor.expect(b'=') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::IsEqualOp, s);
            }
            return self.make(TokenKind::EqualOp, s);
        }
        if self.cursor.expect(b'+') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            if self.cursor.expect(b'+') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::IncrementOp, s);
            }
            return self.make(TokenKind::PlusOp, s);
        }
        if self.cursor.expect(b'-') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            if self.cursor.expect(b'-') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::DecrementOp, s);
            }
            return self.make(TokenKind::MinusOp, s);
        }

        single!(b'$', TokenKind::StringifyOp);
        single!(b'?', TokenKind::BooleanOp);
        single!(b'@', TokenKind::RoundOp);
        single!(b'#', TokenKind::LengthOp);
        single!(b'*', TokenKind::MultOp);

        if self.cursor.expect(b'/') {
            self.cursor.eat();
            if self.cursor.expect(b'/') {
                self.cursor.eat();
                while !self.cursor.expect(b'\n') && !self.cursor.is_eof() {
                    self.cursor.eat();
                }
                self.cursor.update_line_count();
                self.cursor.eat();
                return self.next_token();
            } else if self.cursor.expect(b'*') {
                self.cursor.eat();
                while !self.cursor.is_eof() {
                    if self.cursor.expect(b'\n') {
                        self.cursor.update_line_count();
                    }
                    if !self.cursor.expect(b'*') {
                        self.cursor.eat();
                    } else {
                        self.cursor.eat();
                        if self.cursor.expect(b'/') {
                            self.cursor.eat();
                            return self.next_token();
                        }
                    }
                }
                self.cursor.eat();
                return self.next_token();
            }
            return self.make(TokenKind::DivideOp, "/");
        }

        single!(b'%', TokenKind::ModOp);

        if self.cursor.expect(b'<') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            if self.cursor.expect(b'>') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::NotEqualOp, s);
            } else if self.cursor.expect(b'=') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::LessEqualOp, s);
            }
            return self.make(TokenKind::LessThanOp, s);
        }
        if self.cursor.expect(b'>') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            if self.cursor.expect(b'=') {
                s.push(self.cursor.eat() as char);
                return self.make(TokenKind::GreaterEqualOp, s);
            }
            return self.make(TokenKind::GreaterThanOp, s);
        }

        single!(b';', TokenKind::SemiColonSy);
        single!(b':', TokenKind::ColonSy);
        single!(b',', TokenKind::CommaSy);

        if (self.cursor.peek() as char).is_alphabetic() || self.cursor.expect(b'_') {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            while !self.cursor.is_eof()
                && ((self.cursor.peek() as char).is_alphanumeric() || self.cursor.expect(b'_'))
            {
                s.push(self.cursor.eat() as char);
            }
            let kind = TokenKind::keyword_or_identifier(&s);
            return self.make(kind, s);
        }

        if self.cursor.expect(b'"') {
            self.cursor.eat();
            let mut s = String::new();
            while !self.cursor.expect(b'"') && !self.cursor.is_eof() {
                s.push(self.cursor.eat() as char);
            }
            if self.cursor.is_eof() {
                return self.lexical_error(format!("Unclosed string literal: {}", s));
            }
            self.cursor.eat();
            return self.make(TokenKind::StringSy, s);
        }

        if (self.cursor.peek() as char).is_ascii_digit() {
            let mut s = String::new();
            s.push(self.cursor.eat() as char);
            let mut is_float = false;
            while !self.cursor.is_eof()
                && ((self.cursor.peek() as char).is_ascii_digit() || self.cursor.expect(b'.'))
            {
                if self.cursor.expect(b'.') && !is_float {
                    is_float = true;
                    s.push(self.cursor.eat() as char);
                    if !(self.cursor.peek() as char).is_ascii_digit() {
                        return self.lexical_error(format!("Invalid floating point number {}", s));
                    }
                }
                s.push(self.cursor.eat() as char);
            }
            if is_float {
                return self.make(TokenKind::FloatNum, s);
            }
            return self.make(TokenKind::IntegerNum, s);
        }

        let ch = self.cursor.eat() as char;
        self.lexical_error(format!("Unrecognized token: {}", ch))
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

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut sc = HandCoded::new(src);
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
    fn skips_line_and_block_comments() {
        assert_eq!(
            kinds("1 // comment\n2 /* block \n comment */ 3"),
            vec![
                TokenKind::IntegerNum,
                TokenKind::IntegerNum,
                TokenKind::IntegerNum,
                TokenKind::EndOfFile
            ]
        );
    }

    #[test]
    fn unclosed_string_is_lexical_error() {
        let mut sc = HandCoded::new("\"abc");
        let stream = sc.tokenize_all();
        assert!(stream[0].is_error());
        assert_eq!(stream[0].lexeme, "Unclosed string literal: abc");
    }

    #[test]
    fn invalid_float_is_lexical_error() {
        let mut sc = HandCoded::new("1.a");
        let stream = sc.tokenize_all();
        assert!(stream[0].is_error());
        assert_eq!(stream[0].lexeme, "Invalid floating point number 1.");
    }

    #[test]
    fn unrecognized_byte_is_lexical_error() {
        let mut sc = HandCoded::new("`");
        let stream = sc.tokenize_all();
        assert!(stream[0].is_error());
        assert_eq!(stream[0].lexeme, "Unrecognized token: `");
    }

    #[test]
    fn tokenize_all_restores_cursor() {
        let mut sc = HandCoded::new("var x is integer");
        let first = sc.tokenize_all();
        let second = sc.tokenize_all();
        assert_eq!(first, second);
    }
}
