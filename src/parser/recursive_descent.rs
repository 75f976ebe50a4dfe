//! Recursive-descent parser: one function per non-terminal, ported from
//! `original_source/src/robin/syntax/recursive_decent_parser.cpp`'s method
//! list (`parse_source`, `parse_program`, `parse_function`, ...).
//!
//! Rust's `Result`/`?` gives first-fault latching for free — the first
//! `Err` returned from any `parse_*` call short-circuits every caller on
//! the stack, which is the same contract the original gets from its
//! mutable `has_error`/`ErrorNode` sentinel, expressed idiomatically
//! instead of with a stateful flag.
//!
//! The two context-sensitive disambiguations spec.md calls out both
//! resolve with a single token of lookahead rather than a checkpoint/
//! restore: an identifier's full postfix (index) chain is parsed first
//! and only then checked for a trailing `=` (assignment vs. bare index
//! expression), and `else` is checked for a following `if` before
//! deciding whether the alternate block needs its own closing `end`
//! (dangling-else folded into an else-if chain).

use crate::ast::*;
use crate::error::{Diagnostic, Phase};
use crate::symbol::{PrimType, TypeName};
use crate::token::{Span, Token, TokenKind};

use super::Parser;

pub struct RecursiveDescent {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, Diagnostic>;

impl Parser for RecursiveDescent {
    fn parse(tokens: Vec<Token>) -> PResult<Source> {
        let mut p = RecursiveDescent { tokens, pos: 0 };
        p.parse_source()
    }
}

impl RecursiveDescent {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek().clone();
            Err(self.error(format!("expected {:?}, found {:?}", kind, found.kind), found.span))
        }
    }

    fn error(&self, message: String, span: Span) -> Diagnostic {
        Diagnostic::new(Phase::Syntax, message, span)
    }

    fn wrap_lexical_error(&self, tok: &Token) -> Diagnostic {
        Diagnostic::new(Phase::Syntax, format!("lexical error: {}", tok.lexeme), tok.span)
    }

    fn check_for_error_token(&mut self) -> PResult<()> {
        if self.check(TokenKind::Error) {
            let tok = self.peek().clone();
            return Err(self.wrap_lexical_error(&tok));
        }
        Ok(())
    }

    /// `Assignable := Id IndexChain` — anything else (a call, a literal, a
    /// grouped expression) can't stand on the left of `=`, as a `read`
    /// target, or as the operand of a prefix/postfix `++`/`--`.
    fn require_assignable(&self, expr: &Expr) -> PResult<()> {
        if matches!(expr.kind, ExprKind::Identifier(_) | ExprKind::Index { .. }) {
            Ok(())
        } else {
            Err(self.error("Invalid left-hand side in assignment expression".to_string(), expr.span))
        }
    }

    // ---- grammar entry points ----

    fn parse_source(&mut self) -> PResult<Source> {
        self.check_for_error_token()?;
        let mut functions = Vec::new();
        while self.check(TokenKind::FuncKw) {
            functions.push(self.parse_function()?);
        }
        let program = self.parse_program()?;
        self.expect(TokenKind::EndOfFile)?;
        let span = match functions.first() {
            Some(f) => f.span.merge(program.span),
            None => program.span,
        };
        Ok(Source { program, functions, span })
    }

    fn parse_program(&mut self) -> PResult<ProgramDecl> {
        let start = self.expect(TokenKind::ProgramKw)?.span;
        let name_tok = self.expect(TokenKind::IdSy)?;
        self.expect(TokenKind::IsKw)?;
        let globals = self.parse_var_def_list()?;
        self.expect(TokenKind::BeginKw)?;
        let body = self.parse_stmt_list(&[TokenKind::EndKw])?;
        let end = self.expect(TokenKind::EndKw)?.span;
        Ok(ProgramDecl {
            name: name_tok.lexeme,
            globals,
            body,
            span: start.merge(end),
        })
    }

    fn parse_function(&mut self) -> PResult<FunctionDecl> {
        let start = self.expect(TokenKind::FuncKw)?.span;
        let return_type = self.parse_type()?;
        let name_tok = self.expect(TokenKind::IdSy)?;
        self.expect(TokenKind::HasKw)?;
        let parameters = self.parse_var_def_list()?;
        self.expect(TokenKind::BeginKw)?;
        let body = self.parse_stmt_list(&[TokenKind::EndKw])?;
        self.expect(TokenKind::EndKw)?;
        let end = self.expect(TokenKind::FuncKw)?.span;
        Ok(FunctionDecl {
            name: name_tok.lexeme,
            return_type,
            parameters,
            body,
            span: start.merge(end),
        })
    }

    /// `Type := Primitive | ArrayType`, `ArrayType := "[" ArrayType "]" |
    /// "[" Primitive "]"` — array dimensions are prefix brackets (`[integer]`,
    /// `[[integer]]`), one leading `[` per dimension, with all the closing
    /// `]`s bunched after the primitive rather than interleaved per level.
    /// Shared with `ReturnType` (`"void" | Type`), since `void` is just one
    /// more primitive token here.
    fn parse_type(&mut self) -> PResult<TypeName> {
        let mut dim = 0;
        while self.check(TokenKind::LeftSquarePr) {
            self.advance();
            dim += 1;
        }
        let tok = self.advance();
        let base = match tok.kind {
            TokenKind::IntegerTy => PrimType::Integer,
            TokenKind::BooleanTy => PrimType::Boolean,
            TokenKind::FloatTy => PrimType::Float,
            TokenKind::StringTy => PrimType::String,
            TokenKind::VoidTy => PrimType::Void,
            _ => return Err(self.error(format!("expected a type, found {:?}", tok.kind), tok.span)),
        };
        for _ in 0..dim {
            self.expect(TokenKind::RightSquarePr)?;
        }
        Ok(TypeName { base, dim })
    }

    /// `VarDef*`: a run of back-to-back `var ...;` declarations, stopping
    /// at the first token that isn't `var` (used for both a function's
    /// parameter list and a program/function's locals-up-front globals).
    fn parse_var_def_list(&mut self) -> PResult<Vec<VarDef>> {
        let mut defs = Vec::new();
        while self.check(TokenKind::VarKw) {
            let (def, _span) = self.parse_var_def()?;
            defs.push(def);
        }
        Ok(defs)
    }

    /// `VarDef := "var" IdList (":" Type ";" | ":" Type "=" Init ";")`.
    /// The `=` initializer form is only legal when exactly one name was
    /// listed — a shared-type declaration with several names never takes
    /// an initializer.
    fn parse_var_def(&mut self) -> PResult<(VarDef, Span)> {
        let start = self.expect(TokenKind::VarKw)?.span;
        let mut names = vec![self.expect(TokenKind::IdSy)?.lexeme];
        while self.check(TokenKind::CommaSy) {
            self.advance();
            names.push(self.expect(TokenKind::IdSy)?.lexeme);
        }
        self.expect(TokenKind::ColonSy)?;
        let datatype = self.parse_type()?;

        if names.len() == 1 && self.check(TokenKind::EqualOp) {
            self.advance();
            let initializer = Box::new(self.parse_init()?);
            let end = self.expect(TokenKind::SemiColonSy)?.span;
            return Ok((
                VarDef::Initialization {
                    name: names.into_iter().next().unwrap(),
                    datatype,
                    initializer,
                },
                start.merge(end),
            ));
        }

        let end = self.expect(TokenKind::SemiColonSy)?.span;
        Ok((VarDef::Declaration { names, datatype }, start.merge(end)))
    }

    /// `Init := Or | ArrayLit` — already fully covered by `parse_or`,
    /// since array literals are themselves a `Primary` production reached
    /// through the precedence chain.
    fn parse_init(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_stmt_list(&mut self, terminators: &[TokenKind]) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !terminators.contains(&self.peek_kind()) && !self.check(TokenKind::EndOfFile) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        self.check_for_error_token()?;
        match self.peek_kind() {
            TokenKind::IfKw => self.parse_if(),
            TokenKind::ReturnKw => self.parse_return(),
            TokenKind::SkipKw => {
                let tok = self.advance();
                self.expect(TokenKind::SemiColonSy)?;
                Ok(Stmt::new(StmtKind::Skip, tok.span))
            }
            TokenKind::StopKw => {
                let tok = self.advance();
                self.expect(TokenKind::SemiColonSy)?;
                Ok(Stmt::new(StmtKind::Stop, tok.span))
            }
            TokenKind::ReadKw => self.parse_read(),
            TokenKind::WriteKw => self.parse_write(),
            TokenKind::WhileKw => self.parse_while(),
            TokenKind::ForKw => self.parse_for(),
            TokenKind::VarKw => self.parse_var_stmt(),
            TokenKind::IdSy => self.parse_assignment_stmt(),
            other => {
                let span = self.peek().span;
                Err(self.error(format!("expected a statement, found {:?}", other), span))
            }
        }
    }

    /// `If := "if" Or "then" Stmt* ("else" (If | Stmt*))? "end" "if"`. The
    /// dangling else is folded into a single nested `If` rather than a
    /// flat chain: once `else` is followed by `if`, the nested call
    /// consumes its own `end if`, so this level returns without expecting
    /// a second closer.
    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::IfKw)?.span;
        let condition = Box::new(self.parse_or()?);
        self.expect(TokenKind::ThenKw)?;
        let consequent = self.parse_stmt_list(&[TokenKind::ElseKw, TokenKind::EndKw])?;

        let (alternate, end_span) = if self.check(TokenKind::ElseKw) {
            self.advance();
            if self.check(TokenKind::IfKw) {
                let nested = self.parse_if()?;
                let span = nested.span;
                (vec![nested], span)
            } else {
                let body = self.parse_stmt_list(&[TokenKind::EndKw])?;
                self.expect(TokenKind::EndKw)?;
                let end = self.expect(TokenKind::IfKw)?.span;
                (body, end)
            }
        } else {
            self.expect(TokenKind::EndKw)?;
            let end = self.expect(TokenKind::IfKw)?.span;
            (Vec::new(), end)
        };

        Ok(Stmt::new(
            StmtKind::If { condition, consequent, alternate },
            start.merge(end_span),
        ))
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::ReturnKw)?.span;
        let value = if self.check(TokenKind::SemiColonSy) {
            None
        } else {
            Some(Box::new(self.parse_or()?))
        };
        let end = self.expect(TokenKind::SemiColonSy)?.span;
        Ok(Stmt::new(StmtKind::Return { value }, start.merge(end)))
    }

    /// `Read := "read" Assignable ("," Assignable)* ";"` — each target is a
    /// full `Assignable` (bare identifier or indexed identifier), not a
    /// bare identifier token, so `read a[0];` is legal.
    fn parse_read(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::ReadKw)?.span;
        let mut targets = vec![self.parse_assignable()?];
        while self.check(TokenKind::CommaSy) {
            self.advance();
            targets.push(self.parse_assignable()?);
        }
        let end = self.expect(TokenKind::SemiColonSy)?.span;
        Ok(Stmt::new(StmtKind::Read { targets }, start.merge(end)))
    }

    /// `Assignable := Id IndexChain`.
    fn parse_assignable(&mut self) -> PResult<Expr> {
        let expr = self.parse_postfix()?;
        self.require_assignable(&expr)?;
        Ok(expr)
    }

    fn parse_write(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::WriteKw)?.span;
        let mut args = vec![self.parse_or()?];
        while self.check(TokenKind::CommaSy) {
            self.advance();
            args.push(self.parse_or()?);
        }
        let end = self.expect(TokenKind::SemiColonSy)?.span;
        Ok(Stmt::new(StmtKind::Write { args }, start.merge(end)))
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::WhileKw)?.span;
        let condition = Box::new(self.parse_or()?);
        self.expect(TokenKind::DoKw)?;
        let body = self.parse_stmt_list(&[TokenKind::EndKw])?;
        self.expect(TokenKind::EndKw)?;
        let end = self.expect(TokenKind::WhileKw)?.span;
        Ok(Stmt::new(StmtKind::While { condition, body }, start.merge(end)))
    }

    /// `For := "for" IntAssign ";" Or ";" Expr "do" Stmt* "end" "for"`.
    fn parse_for(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokenKind::ForKw)?.span;
        let init = Box::new(self.parse_int_assign()?);
        self.expect(TokenKind::SemiColonSy)?;
        let condition = Box::new(self.parse_or()?);
        self.expect(TokenKind::SemiColonSy)?;
        let update = Box::new(self.parse_expr()?);
        self.expect(TokenKind::DoKw)?;
        let body = self.parse_stmt_list(&[TokenKind::EndKw])?;
        self.expect(TokenKind::EndKw)?;
        let end = self.expect(TokenKind::ForKw)?.span;
        Ok(Stmt::new(
            StmtKind::For { init, condition, update, body },
            start.merge(end),
        ))
    }

    /// `IntAssign := Id "=" Or` — the for-loop initializer is a plain
    /// identifier assignment, built directly rather than through the
    /// general assignable-expression machinery.
    fn parse_int_assign(&mut self) -> PResult<Expr> {
        let name_tok = self.expect(TokenKind::IdSy)?;
        self.expect(TokenKind::EqualOp)?;
        let value = Box::new(self.parse_or()?);
        let span = name_tok.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assignment {
                assignee: Box::new(Expr::new(ExprKind::Identifier(name_tok.lexeme), name_tok.span)),
                value,
            },
            span,
        ))
    }

    fn parse_var_stmt(&mut self) -> PResult<Stmt> {
        let (def, span) = self.parse_var_def()?;
        Ok(Stmt::new(StmtKind::VarDef(def), span))
    }

    /// An identifier-led statement: always an assignment (`x = expr;` or
    /// `x[i] = expr;`) — this grammar has no bare expression-statement.
    fn parse_assignment_stmt(&mut self) -> PResult<Stmt> {
        let expr = self.parse_assignment_stmt_expr()?;
        let end = self.expect(TokenKind::SemiColonSy)?.span;
        let span = expr.span.merge(end);
        Ok(Stmt::new(StmtKind::Assign(Box::new(expr)), span))
    }

    fn parse_assignment_stmt_expr(&mut self) -> PResult<Expr> {
        self.parse_assignment()
    }

    // ---- expressions, in precedence order ----

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_assignment()
    }

    /// Parses the lvalue candidate first, then checks for `=` — the
    /// "identifier + indexing vs. assignment" disambiguation. The lvalue
    /// must itself be assignable (bare identifier or indexed identifier);
    /// anything else (`1 = 2`, `f(x) = 1`) is a syntax error here rather
    /// than a later semantic one. `Assignment := Assignable "=" (Or |
    /// ArrayLit)` — the right-hand side is never itself an assignment, so
    /// `a = b = 1;` is rejected the same way the grammar rejects it.
    fn parse_assignment(&mut self) -> PResult<Expr> {
        let lhs = self.parse_or()?;
        if self.check(TokenKind::EqualOp) {
            self.require_assignable(&lhs)?;
            self.advance();
            let rhs = self.parse_or()?;
            let span = lhs.span.merge(rhs.span);
            return Ok(Expr::new(
                ExprKind::Assignment { assignee: Box::new(lhs), value: Box::new(rhs) },
                span,
            ));
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::OrKw) {
            self.advance();
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Or { left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::AndKw) {
            self.advance();
            let right = self.parse_equality()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::And { left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::IsEqualOp => EqualityOp::Eq,
                TokenKind::NotEqualOp => EqualityOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Equality { left: Box::new(left), right: Box::new(right), op }, span);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> PResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::LessThanOp => RelationalOp::Lt,
                TokenKind::LessEqualOp => RelationalOp::Le,
                TokenKind::GreaterThanOp => RelationalOp::Gt,
                TokenKind::GreaterEqualOp => RelationalOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Relational { left: Box::new(left), right: Box::new(right), op }, span);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::PlusOp => AdditiveOp::Add,
                TokenKind::MinusOp => AdditiveOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Additive { left: Box::new(left), right: Box::new(right), op }, span);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::MultOp => MultiplicativeOp::Mul,
                TokenKind::DivideOp => MultiplicativeOp::Div,
                TokenKind::ModOp => MultiplicativeOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Multiplicative { left: Box::new(left), right: Box::new(right), op }, span);
        }
        Ok(left)
    }

    /// `Unary := ("-"|"$"|"?"|"@"|"#") Index | ("++"|"--") Assignable |
    /// "not" Index | Index ("++"|"--")?` — prefix `++`/`--` require an
    /// assignable operand specifically; the other prefix operators and
    /// the postfix form all bottom out at `Index`/`Assignable` via
    /// `parse_postfix`.
    fn parse_unary(&mut self) -> PResult<Expr> {
        if self.check(TokenKind::IncrementOp) || self.check(TokenKind::DecrementOp) {
            let op = if self.check(TokenKind::IncrementOp) { UnaryOp::Increment } else { UnaryOp::Decrement };
            let start = self.advance().span;
            let operand = self.parse_postfix()?;
            self.require_assignable(&operand)?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Unary { operand: Box::new(operand), op, postfix: false }, span));
        }

        let op = match self.peek_kind() {
            TokenKind::MinusOp => Some(UnaryOp::Neg),
            TokenKind::NotKw => Some(UnaryOp::Not),
            TokenKind::StringifyOp => Some(UnaryOp::Stringify),
            TokenKind::BooleanOp => Some(UnaryOp::Booleanize),
            TokenKind::RoundOp => Some(UnaryOp::Round),
            TokenKind::LengthOp => Some(UnaryOp::Length),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = Box::new(self.parse_postfix()?);
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Unary { operand, op, postfix: false }, span));
        }

        let mut expr = self.parse_postfix()?;
        if self.check(TokenKind::IncrementOp) || self.check(TokenKind::DecrementOp) {
            self.require_assignable(&expr)?;
            let op = if self.check(TokenKind::IncrementOp) { UnaryOp::Increment } else { UnaryOp::Decrement };
            let end = self.advance().span;
            let span = expr.span.merge(end);
            expr = Expr::new(ExprKind::Unary { operand: Box::new(expr), op, postfix: true }, span);
        }
        Ok(expr)
    }

    /// `Index := Primary ("[" Or "]")*`. The bracketed content is
    /// restricted to `Or` (no assignment inside an index), per spec.md's
    /// explicit grammar — stricter than the original implementation,
    /// which accepts a full `Expr` there.
    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.check(TokenKind::LeftSquarePr) {
            self.advance();
            let index = Box::new(self.parse_or()?);
            let end = self.expect(TokenKind::RightSquarePr)?.span;
            let span = expr.span.merge(end);
            expr = Expr::new(ExprKind::Index { base: Box::new(expr), index }, span);
        }
        Ok(expr)
    }

    /// `Primary := "(" Expr ")" | Literal | Id | Id "(" ArgList? ")"`,
    /// `ArgList := Or ("," Or)*`.
    fn parse_primary(&mut self) -> PResult<Expr> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::IdSy => {
                self.advance();
                if self.check(TokenKind::LeftPr) {
                    self.advance();
                    let mut arguments = Vec::new();
                    if !self.check(TokenKind::RightPr) {
                        arguments.push(self.parse_or()?);
                        while self.check(TokenKind::CommaSy) {
                            self.advance();
                            arguments.push(self.parse_or()?);
                        }
                    }
                    let end = self.expect(TokenKind::RightPr)?.span;
                    let span = tok.span.merge(end);
                    Ok(Expr::new(ExprKind::Call { function: tok.lexeme, arguments }, span))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(tok.lexeme), tok.span))
                }
            }
            TokenKind::IntegerNum => {
                self.advance();
                let value: i64 = tok.lexeme.parse().map_err(|_| {
                    self.error(format!("invalid integer literal '{}'", tok.lexeme), tok.span)
                })?;
                Ok(Expr::new(ExprKind::IntegerLit(value), tok.span))
            }
            TokenKind::FloatNum => {
                self.advance();
                let value: f64 = tok.lexeme.parse().map_err(|_| {
                    self.error(format!("invalid float literal '{}'", tok.lexeme), tok.span)
                })?;
                Ok(Expr::new(ExprKind::FloatLit(value), tok.span))
            }
            TokenKind::StringSy => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(tok.lexeme), tok.span))
            }
            TokenKind::TrueKw => {
                self.advance();
                Ok(Expr::new(ExprKind::BooleanLit(true), tok.span))
            }
            TokenKind::FalseKw => {
                self.advance();
                Ok(Expr::new(ExprKind::BooleanLit(false), tok.span))
            }
            TokenKind::LeftCurlyPr => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(TokenKind::RightCurlyPr) {
                    elements.push(self.parse_or()?);
                    while self.check(TokenKind::CommaSy) {
                        self.advance();
                        elements.push(self.parse_or()?);
                    }
                }
                let end = self.expect(TokenKind::RightCurlyPr)?.span;
                Ok(Expr::new(ExprKind::ArrayLit(elements), tok.span.merge(end)))
            }
            TokenKind::LeftPr => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightPr)?;
                Ok(inner)
            }
            TokenKind::Error => Err(self.wrap_lexical_error(&tok)),
            other => Err(self.error(format!("expected an expression, found {:?}", other), tok.span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{HandCoded, Scanner};

    fn parse(src: &str) -> PResult<Source> {
        let tokens = HandCoded::new(src).tokenize_all();
        RecursiveDescent::parse(tokens)
    }

    #[test]
    fn parses_minimal_program() {
        let src = "program demo is begin end";
        let source = parse(src).expect("should parse");
        assert_eq!(source.program.name, "demo");
        assert!(source.program.body.is_empty());
        assert!(source.functions.is_empty());
    }

    #[test]
    fn parses_var_declaration_and_assignment() {
        let src = "program demo is begin var x : integer; x = 1; end";
        let source = parse(src).expect("should parse");
        assert_eq!(source.program.body.len(), 2);
        match &source.program.body[1].kind {
            StmtKind::Assign(expr) => match &expr.kind {
                ExprKind::Assignment { .. } => {}
                other => panic!("expected assignment, got {:?}", other),
            },
            other => panic!("expected assign statement, got {:?}", other),
        }
    }

    #[test]
    fn parses_dangling_else_as_else_if_chain() {
        let src = "program demo is begin if a then skip; else if b then stop; end if end";
        let source = parse(src).expect("should parse");
        match &source.program.body[0].kind {
            StmtKind::If { alternate, .. } => {
                assert_eq!(alternate.len(), 1);
                match &alternate[0].kind {
                    StmtKind::If { .. } => {}
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn parses_index_chain_before_assignment() {
        let src = "program demo is begin var a : [integer]; a[0] = 1; end";
        let source = parse(src).expect("should parse");
        match &source.program.body[1].kind {
            StmtKind::Assign(expr) => match &expr.kind {
                ExprKind::Assignment { assignee, .. } => match &assignee.kind {
                    ExprKind::Index { .. } => {}
                    other => panic!("expected index assignee, got {:?}", other),
                },
                other => panic!("expected assignment, got {:?}", other),
            },
            other => panic!("expected assign statement, got {:?}", other),
        }
    }

    #[test]
    fn parses_read_with_indexed_target() {
        let src = "program demo is begin var a : [integer]; read a[0]; end";
        let source = parse(src).expect("should parse");
        match &source.program.body[1].kind {
            StmtKind::Read { targets } => {
                assert_eq!(targets.len(), 1);
                assert!(matches!(targets[0].kind, ExprKind::Index { .. }));
            }
            other => panic!("expected read statement, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_assignable_left_hand_side() {
        let src = "program demo is begin 1 = 2; end";
        assert!(parse(src).is_err());
    }

    #[test]
    fn rejects_non_assignable_read_target() {
        let src = "program demo is begin read 1; end";
        assert!(parse(src).is_err());
    }

    #[test]
    fn missing_end_is_a_syntax_error() {
        let src = "program demo is begin";
        assert!(parse(src).is_err());
    }

    #[test]
    fn lexical_error_is_wrapped_as_syntax_error() {
        let src = "program demo is begin var x : integer = `; end";
        let err = parse(src).unwrap_err();
        assert_eq!(err.phase, Phase::Syntax);
    }

    #[test]
    fn parses_function_with_parameters_and_call() {
        let src = "func integer add has var x : integer; var y : integer; \
                    begin return x + y; end func \
                    program demo is begin write add(1, 2); end";
        let source = parse(src).expect("should parse");
        assert_eq!(source.functions.len(), 1);
        assert_eq!(source.functions[0].parameters.len(), 2);
    }

    #[test]
    fn array_type_is_prefix() {
        let src = "program demo is begin var a : [[integer]] = {{1,2},{3}}; end";
        let source = parse(src).expect("should parse");
        match &source.program.globals[0] {
            VarDef::Initialization { datatype, .. } => {
                assert_eq!(datatype.dim, 2);
                assert_eq!(datatype.base, PrimType::Integer);
            }
            other => panic!("expected initialization, got {:?}", other),
        }
    }
}
