//! The table-driven parser: an explicit `symbol_stack`/`value_stack` pair
//! instead of Rust's call stack, conceptually ported from
//! `original_source/include/robin/syntax/ll1_parser.h`'s `SymbolLL1` +
//! `builder` driver loop.
//!
//! `symbol_stack` holds what's left to recognize, LIFO. Each
//! [`NonTerminal`] is expanded — replaced by the symbols of whichever
//! production the current lookahead predicts — the moment it's popped,
//! so a production choice always sees the lookahead that's actually
//! correct for that point in the input, never the lookahead from when
//! the non-terminal was first pushed. `value_stack` holds the AST
//! fragments built so far; a [`Reduce`] marker pops its production's
//! already-built pieces off it (in reverse of their left-to-right
//! order — the last-completed piece is always on top) and pushes the
//! combined result back.
//!
//! This must build the same tree as [`super::recursive_descent::RecursiveDescent`]
//! for the same valid input, and latch the same first fault for the
//! same invalid input (spec §8 parser parity) — every disambiguation
//! here (dangling-else, identifier-vs-assignment, shared-type
//! declaration vs. initializer) mirrors the recursive-descent version's
//! resolution, just expressed as a deferred non-terminal instead of a
//! sequential peek.

use crate::ast::*;
use crate::error::{Diagnostic, Phase};
use crate::symbol::{PrimType, TypeName};
use crate::token::{Span, Token, TokenKind};

use super::grammar::{NonTerminal, Reduce, StackSym};
use super::Parser;

type PResult<T> = Result<T, Diagnostic>;

#[derive(Debug)]
enum Value {
    Tok(Token),
    Expr(Expr),
    ExprList(Vec<Expr>),
    EqTail(Vec<(EqualityOp, Expr)>),
    RelTail(Vec<(RelationalOp, Expr)>),
    AddTail(Vec<(AdditiveOp, Expr)>),
    MulTail(Vec<(MultiplicativeOp, Expr)>),
    Stmt(Stmt),
    StmtList(Vec<Stmt>),
    VarDef(VarDef, Span),
    VarDefList(Vec<VarDef>),
    NameList(Vec<String>),
    Type(TypeName),
    Program(ProgramDecl),
    Func(FunctionDecl),
    FuncList(Vec<FunctionDecl>),
    Source(Source),
}

pub struct Ll1;

impl Parser for Ll1 {
    fn parse(tokens: Vec<Token>) -> PResult<Source> {
        let mut driver = Driver {
            tokens,
            pos: 0,
            symbol_stack: vec![StackSym::N(NonTerminal::Source)],
            value_stack: Vec::new(),
        };
        driver.run()
    }
}

struct Driver {
    tokens: Vec<Token>,
    pos: usize,
    symbol_stack: Vec<StackSym>,
    value_stack: Vec<Value>,
}

fn starts_expr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::MinusOp
            | TokenKind::NotKw
            | TokenKind::IncrementOp
            | TokenKind::DecrementOp
            | TokenKind::StringifyOp
            | TokenKind::BooleanOp
            | TokenKind::RoundOp
            | TokenKind::LengthOp
            | TokenKind::IdSy
            | TokenKind::IntegerNum
            | TokenKind::FloatNum
            | TokenKind::StringSy
            | TokenKind::TrueKw
            | TokenKind::FalseKw
            | TokenKind::LeftCurlyPr
            | TokenKind::LeftPr
    )
}

fn starts_stmt(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IfKw
            | TokenKind::ReturnKw
            | TokenKind::SkipKw
            | TokenKind::StopKw
            | TokenKind::ReadKw
            | TokenKind::WriteKw
            | TokenKind::WhileKw
            | TokenKind::ForKw
            | TokenKind::VarKw
            | TokenKind::IdSy
            | TokenKind::Error
    )
}

fn unary_op_of(kind: TokenKind) -> UnaryOp {
    match kind {
        TokenKind::MinusOp => UnaryOp::Neg,
        TokenKind::NotKw => UnaryOp::Not,
        TokenKind::IncrementOp => UnaryOp::Increment,
        TokenKind::DecrementOp => UnaryOp::Decrement,
        TokenKind::StringifyOp => UnaryOp::Stringify,
        TokenKind::BooleanOp => UnaryOp::Booleanize,
        TokenKind::RoundOp => UnaryOp::Round,
        TokenKind::LengthOp => UnaryOp::Length,
        other => unreachable!("not a unary operator token: {:?}", other),
    }
}

impl Driver {
    fn run(&mut self) -> PResult<Source> {
        while let Some(sym) = self.symbol_stack.pop() {
            match sym {
                StackSym::T(kind) => self.match_terminal(kind, false)?,
                StackSym::Tc(kind) => self.match_terminal(kind, true)?,
                StackSym::N(nt) => self.expand(nt)?,
                StackSym::R(r) => self.reduce(r)?,
            }
        }
        match self.value_stack.pop() {
            Some(Value::Source(src)) => Ok(src),
            other => unreachable!("ll1 driver finished with unexpected stack top: {:?}", other),
        }
    }

    // ---- token-stream plumbing, mirrored from the recursive-descent parser ----

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: String, span: Span) -> Diagnostic {
        Diagnostic::new(Phase::Syntax, message, span)
    }

    fn wrap_lexical_error(&self, tok: &Token) -> Diagnostic {
        Diagnostic::new(Phase::Syntax, format!("lexical error: {}", tok.lexeme), tok.span)
    }

    fn check_for_error_token(&mut self) -> PResult<()> {
        if self.peek_kind() == TokenKind::Error {
            let tok = self.peek().clone();
            return Err(self.wrap_lexical_error(&tok));
        }
        Ok(())
    }

    fn match_terminal(&mut self, kind: TokenKind, capture: bool) -> PResult<()> {
        if self.peek_kind() == kind {
            let tok = self.advance();
            if capture {
                self.value_stack.push(Value::Tok(tok));
            }
            Ok(())
        } else {
            let found = self.peek().clone();
            Err(self.error(format!("expected {:?}, found {:?}", kind, found.kind), found.span))
        }
    }

    fn push_seq(&mut self, syms: Vec<StackSym>) {
        for s in syms.into_iter().rev() {
            self.symbol_stack.push(s);
        }
    }

    // ---- value-stack pops (internal bookkeeping; a mismatch here is a driver bug) ----

    fn pop_tok(&mut self) -> Token {
        match self.value_stack.pop() {
            Some(Value::Tok(t)) => t,
            other => unreachable!("expected Value::Tok, found {:?}", other),
        }
    }

    fn pop_expr(&mut self) -> Expr {
        match self.value_stack.pop() {
            Some(Value::Expr(e)) => e,
            other => unreachable!("expected Value::Expr, found {:?}", other),
        }
    }

    fn push_expr(&mut self, e: Expr) {
        self.value_stack.push(Value::Expr(e));
    }

    fn pop_expr_list(&mut self) -> Vec<Expr> {
        match self.value_stack.pop() {
            Some(Value::ExprList(v)) => v,
            other => unreachable!("expected Value::ExprList, found {:?}", other),
        }
    }

    fn pop_stmt(&mut self) -> Stmt {
        match self.value_stack.pop() {
            Some(Value::Stmt(s)) => s,
            other => unreachable!("expected Value::Stmt, found {:?}", other),
        }
    }

    fn pop_stmt_list(&mut self) -> Vec<Stmt> {
        match self.value_stack.pop() {
            Some(Value::StmtList(v)) => v,
            other => unreachable!("expected Value::StmtList, found {:?}", other),
        }
    }

    fn pop_var_def(&mut self) -> VarDef {
        match self.value_stack.pop() {
            Some(Value::VarDef(v, _)) => v,
            other => unreachable!("expected Value::VarDef, found {:?}", other),
        }
    }

    fn pop_var_def_with_span(&mut self) -> (VarDef, Span) {
        match self.value_stack.pop() {
            Some(Value::VarDef(v, s)) => (v, s),
            other => unreachable!("expected Value::VarDef, found {:?}", other),
        }
    }

    fn pop_var_def_list(&mut self) -> Vec<VarDef> {
        match self.value_stack.pop() {
            Some(Value::VarDefList(v)) => v,
            other => unreachable!("expected Value::VarDefList, found {:?}", other),
        }
    }

    fn pop_name_list(&mut self) -> Vec<String> {
        match self.value_stack.pop() {
            Some(Value::NameList(v)) => v,
            other => unreachable!("expected Value::NameList, found {:?}", other),
        }
    }

    fn pop_type(&mut self) -> TypeName {
        match self.value_stack.pop() {
            Some(Value::Type(t)) => t,
            other => unreachable!("expected Value::Type, found {:?}", other),
        }
    }

    fn pop_func(&mut self) -> FunctionDecl {
        match self.value_stack.pop() {
            Some(Value::Func(f)) => f,
            other => unreachable!("expected Value::Func, found {:?}", other),
        }
    }

    fn pop_func_list(&mut self) -> Vec<FunctionDecl> {
        match self.value_stack.pop() {
            Some(Value::FuncList(v)) => v,
            other => unreachable!("expected Value::FuncList, found {:?}", other),
        }
    }

    fn pop_program(&mut self) -> ProgramDecl {
        match self.value_stack.pop() {
            Some(Value::Program(p)) => p,
            other => unreachable!("expected Value::Program, found {:?}", other),
        }
    }

    fn pop_eq_tail(&mut self) -> Vec<(EqualityOp, Expr)> {
        match self.value_stack.pop() {
            Some(Value::EqTail(v)) => v,
            other => unreachable!("expected Value::EqTail, found {:?}", other),
        }
    }

    fn pop_rel_tail(&mut self) -> Vec<(RelationalOp, Expr)> {
        match self.value_stack.pop() {
            Some(Value::RelTail(v)) => v,
            other => unreachable!("expected Value::RelTail, found {:?}", other),
        }
    }

    fn pop_add_tail(&mut self) -> Vec<(AdditiveOp, Expr)> {
        match self.value_stack.pop() {
            Some(Value::AddTail(v)) => v,
            other => unreachable!("expected Value::AddTail, found {:?}", other),
        }
    }

    fn pop_mul_tail(&mut self) -> Vec<(MultiplicativeOp, Expr)> {
        match self.value_stack.pop() {
            Some(Value::MulTail(v)) => v,
            other => unreachable!("expected Value::MulTail, found {:?}", other),
        }
    }

    /// `Assignable := Id IndexChain` — validates the `Expr` already on top
    /// of the value stack in place, without consuming it. Shared by
    /// `read` targets and prefix/postfix `++`/`--` operands.
    fn check_assignable_top(&self) -> PResult<()> {
        let expr = match self.value_stack.last() {
            Some(Value::Expr(e)) => e,
            other => unreachable!("expected Value::Expr, found {:?}", other),
        };
        if matches!(expr.kind, ExprKind::Identifier(_) | ExprKind::Index { .. }) {
            Ok(())
        } else {
            Err(self.error("Invalid left-hand side in assignment expression".to_string(), expr.span))
        }
    }

    // ---- production dispatch: decides, from the *current* lookahead, which
    // alternative of `nt` to push. Because a non-terminal is only expanded the
    // instant it's popped, this always sees the lookahead correct for this
    // point in the input, even for decisions (else-if, shared-type decl vs.
    // initializer) that depend on symbols parsed since `nt` was first pushed. ----

    fn expand(&mut self, nt: NonTerminal) -> PResult<()> {
        use NonTerminal::*;
        use StackSym::{N, R, T};

        match nt {
            Source => {
                self.check_for_error_token()?;
                self.push_seq(vec![N(FuncList), N(Program), T(TokenKind::EndOfFile), R(Reduce::Source)]);
            }
            Program => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::ProgramKw),
                    StackSym::Tc(TokenKind::IdSy),
                    T(TokenKind::IsKw),
                    N(VarDefList),
                    T(TokenKind::BeginKw),
                    N(StmtList),
                    StackSym::Tc(TokenKind::EndKw),
                    R(Reduce::Program),
                ]);
            }
            FuncList => {
                if self.peek_kind() == TokenKind::FuncKw {
                    self.push_seq(vec![N(Func), N(FuncList), R(Reduce::FuncListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::FuncListNil)]);
                }
            }
            Func => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::FuncKw),
                    N(Type),
                    StackSym::Tc(TokenKind::IdSy),
                    T(TokenKind::HasKw),
                    N(VarDefList),
                    T(TokenKind::BeginKw),
                    N(StmtList),
                    T(TokenKind::EndKw),
                    StackSym::Tc(TokenKind::FuncKw),
                    R(Reduce::Func),
                ]);
            }
            // `Type := Primitive | ArrayType`, `ArrayType := "[" ArrayType "]"
            // | "[" Primitive "]"` — a leading `[` recurses one dimension
            // deeper; the base case matches a bare primitive/`void` token.
            Type => {
                if self.peek_kind() == TokenKind::LeftSquarePr {
                    self.push_seq(vec![
                        T(TokenKind::LeftSquarePr),
                        N(Type),
                        T(TokenKind::RightSquarePr),
                        R(Reduce::TypeWrap),
                    ]);
                } else {
                    let kind = self.peek_kind();
                    if matches!(
                        kind,
                        TokenKind::IntegerTy
                            | TokenKind::BooleanTy
                            | TokenKind::FloatTy
                            | TokenKind::StringTy
                            | TokenKind::VoidTy
                    ) {
                        self.push_seq(vec![StackSym::Tc(kind), R(Reduce::TypeBase)]);
                    } else {
                        let tok = self.peek().clone();
                        return Err(self.error(format!("expected a type, found {:?}", tok.kind), tok.span));
                    }
                }
            }
            // `VarDef*`: a run of self-terminating `var ...;` declarations,
            // with no separator between them.
            VarDefList => {
                if self.peek_kind() == TokenKind::VarKw {
                    self.push_seq(vec![N(VarDef), N(VarDefList), R(Reduce::VarDefListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::VarDefListNil)]);
                }
            }
            // `VarDef := "var" IdList (":" Type ";" | ":" Type "=" Init ";")`.
            VarDef => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::VarKw),
                    StackSym::Tc(TokenKind::IdSy),
                    N(NameListTail),
                    T(TokenKind::ColonSy),
                    N(Type),
                    N(VarDefTail),
                ]);
            }
            VarDefTail => {
                // Value stack here (top first): Type, NameList, Tok(first
                // id), Tok(var). A shared-type declaration only takes an
                // initializer when exactly one name was listed, matching
                // the recursive-descent parser's `names.len() == 1` guard.
                let len = self.value_stack.len();
                let rest_is_empty = match &self.value_stack[len - 2] {
                    Value::NameList(v) => v.is_empty(),
                    other => unreachable!("expected Value::NameList, found {:?}", other),
                };
                if rest_is_empty && self.peek_kind() == TokenKind::EqualOp {
                    self.push_seq(vec![
                        T(TokenKind::EqualOp),
                        N(Or),
                        StackSym::Tc(TokenKind::SemiColonSy),
                        R(Reduce::VarDefInitialization),
                    ]);
                } else {
                    self.push_seq(vec![StackSym::Tc(TokenKind::SemiColonSy), R(Reduce::VarDefDeclaration)]);
                }
            }
            NameListTail => {
                if self.peek_kind() == TokenKind::CommaSy {
                    self.push_seq(vec![
                        T(TokenKind::CommaSy),
                        StackSym::Tc(TokenKind::IdSy),
                        N(NameListTail),
                        R(Reduce::NameListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::NameListNil)]);
                }
            }
            StmtList => {
                if starts_stmt(self.peek_kind()) {
                    self.push_seq(vec![N(Stmt), N(StmtList), R(Reduce::StmtListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::StmtListNil)]);
                }
            }
            Stmt => {
                self.check_for_error_token()?;
                match self.peek_kind() {
                    TokenKind::IfKw => self.push_seq(vec![N(IfStmt)]),
                    TokenKind::ReturnKw => self.push_seq(vec![N(ReturnStmt)]),
                    TokenKind::SkipKw => self.push_seq(vec![
                        StackSym::Tc(TokenKind::SkipKw),
                        T(TokenKind::SemiColonSy),
                        R(Reduce::Skip),
                    ]),
                    TokenKind::StopKw => self.push_seq(vec![
                        StackSym::Tc(TokenKind::StopKw),
                        T(TokenKind::SemiColonSy),
                        R(Reduce::Stop),
                    ]),
                    TokenKind::ReadKw => self.push_seq(vec![N(ReadStmt)]),
                    TokenKind::WriteKw => self.push_seq(vec![N(WriteStmt)]),
                    TokenKind::WhileKw => self.push_seq(vec![N(WhileStmt)]),
                    TokenKind::ForKw => self.push_seq(vec![N(ForStmt)]),
                    TokenKind::VarKw => self.push_seq(vec![N(VarStmt)]),
                    TokenKind::IdSy => self.push_seq(vec![N(AssignStmt)]),
                    other => {
                        let span = self.peek().span;
                        return Err(self.error(format!("expected a statement, found {:?}", other), span));
                    }
                }
            }
            // `If := "if" Or "then" Stmt* ("else" (If | Stmt*))? "end" "if"`.
            IfStmt => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::IfKw),
                    N(Or),
                    T(TokenKind::ThenKw),
                    N(StmtList),
                    N(ElseClause),
                ]);
            }
            ElseClause => {
                if self.peek_kind() == TokenKind::ElseKw {
                    self.push_seq(vec![T(TokenKind::ElseKw), N(ElseBody)]);
                } else {
                    self.push_seq(vec![
                        T(TokenKind::EndKw),
                        StackSym::Tc(TokenKind::IfKw),
                        R(Reduce::IfPlain),
                    ]);
                }
            }
            ElseBody => {
                if self.peek_kind() == TokenKind::IfKw {
                    self.push_seq(vec![N(IfStmt), R(Reduce::IfElseIf)]);
                } else {
                    self.push_seq(vec![
                        N(StmtList),
                        T(TokenKind::EndKw),
                        StackSym::Tc(TokenKind::IfKw),
                        R(Reduce::IfElseBlock),
                    ]);
                }
            }
            ReturnStmt => {
                self.push_seq(vec![StackSym::Tc(TokenKind::ReturnKw), N(ReturnTail)]);
            }
            ReturnTail => {
                if self.peek_kind() == TokenKind::SemiColonSy {
                    self.push_seq(vec![StackSym::Tc(TokenKind::SemiColonSy), R(Reduce::ReturnVoid)]);
                } else {
                    self.push_seq(vec![
                        N(Or),
                        StackSym::Tc(TokenKind::SemiColonSy),
                        R(Reduce::ReturnWithValue),
                    ]);
                }
            }
            // `Read := "read" Assignable ("," Assignable)* ";"` — each
            // target is parsed as a full postfix chain, then validated.
            ReadStmt => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::ReadKw),
                    N(Postfix),
                    R(Reduce::Assignable),
                    N(ReadTail),
                    StackSym::Tc(TokenKind::SemiColonSy),
                    R(Reduce::Read),
                ]);
            }
            ReadTail => {
                if self.peek_kind() == TokenKind::CommaSy {
                    self.push_seq(vec![
                        T(TokenKind::CommaSy),
                        N(Postfix),
                        R(Reduce::Assignable),
                        N(ReadTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            WriteStmt => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::WriteKw),
                    N(Or),
                    N(ExprListTail),
                    StackSym::Tc(TokenKind::SemiColonSy),
                    R(Reduce::Write),
                ]);
            }
            ExprListTail => {
                if self.peek_kind() == TokenKind::CommaSy {
                    self.push_seq(vec![
                        T(TokenKind::CommaSy),
                        N(Or),
                        N(ExprListTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            WhileStmt => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::WhileKw),
                    N(Or),
                    T(TokenKind::DoKw),
                    N(StmtList),
                    T(TokenKind::EndKw),
                    StackSym::Tc(TokenKind::WhileKw),
                    R(Reduce::While),
                ]);
            }
            // `For := "for" IntAssign ";" Or ";" Expr "do" Stmt* "end" "for"`.
            ForStmt => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::ForKw),
                    N(IntAssign),
                    T(TokenKind::SemiColonSy),
                    N(Or),
                    T(TokenKind::SemiColonSy),
                    N(Expr),
                    T(TokenKind::DoKw),
                    N(StmtList),
                    T(TokenKind::EndKw),
                    StackSym::Tc(TokenKind::ForKw),
                    R(Reduce::For),
                ]);
            }
            // `IntAssign := Id "=" Or`.
            IntAssign => {
                self.push_seq(vec![
                    StackSym::Tc(TokenKind::IdSy),
                    T(TokenKind::EqualOp),
                    N(Or),
                    R(Reduce::IntAssign),
                ]);
            }
            VarStmt => {
                self.push_seq(vec![N(VarDef), R(Reduce::VarStmt)]);
            }
            AssignStmt => {
                self.push_seq(vec![
                    N(Assignment),
                    StackSym::Tc(TokenKind::SemiColonSy),
                    R(Reduce::AssignStmt),
                ]);
            }
            Expr => {
                self.push_seq(vec![N(Assignment)]);
            }
            Assignment => {
                self.push_seq(vec![N(Or), N(AssignmentTail)]);
            }
            AssignmentTail => {
                if self.peek_kind() == TokenKind::EqualOp {
                    self.push_seq(vec![T(TokenKind::EqualOp), N(Or), R(Reduce::Assignment)]);
                } else {
                    self.push_seq(vec![R(Reduce::Noop)]);
                }
            }
            Or => {
                self.push_seq(vec![N(And), N(OrTail), R(Reduce::Or)]);
            }
            OrTail => {
                if self.peek_kind() == TokenKind::OrKw {
                    self.push_seq(vec![T(TokenKind::OrKw), N(And), N(OrTail), R(Reduce::ExprListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            And => {
                self.push_seq(vec![N(Equality), N(AndTail), R(Reduce::And)]);
            }
            AndTail => {
                if self.peek_kind() == TokenKind::AndKw {
                    self.push_seq(vec![
                        T(TokenKind::AndKw),
                        N(Equality),
                        N(AndTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            Equality => {
                self.push_seq(vec![N(Relational), N(EqualityTail), R(Reduce::Equality)]);
            }
            EqualityTail => {
                let kind = self.peek_kind();
                if matches!(kind, TokenKind::IsEqualOp | TokenKind::NotEqualOp) {
                    self.push_seq(vec![
                        StackSym::Tc(kind),
                        N(Relational),
                        N(EqualityTail),
                        R(Reduce::EqualityTailCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::EqualityTailNil)]);
                }
            }
            Relational => {
                self.push_seq(vec![N(Additive), N(RelationalTail), R(Reduce::Relational)]);
            }
            RelationalTail => {
                let kind = self.peek_kind();
                if matches!(
                    kind,
                    TokenKind::LessThanOp | TokenKind::LessEqualOp | TokenKind::GreaterThanOp | TokenKind::GreaterEqualOp
                ) {
                    self.push_seq(vec![
                        StackSym::Tc(kind),
                        N(Additive),
                        N(RelationalTail),
                        R(Reduce::RelationalTailCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::RelationalTailNil)]);
                }
            }
            Additive => {
                self.push_seq(vec![N(Multiplicative), N(AdditiveTail), R(Reduce::Additive)]);
            }
            AdditiveTail => {
                let kind = self.peek_kind();
                if matches!(kind, TokenKind::PlusOp | TokenKind::MinusOp) {
                    self.push_seq(vec![
                        StackSym::Tc(kind),
                        N(Multiplicative),
                        N(AdditiveTail),
                        R(Reduce::AdditiveTailCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::AdditiveTailNil)]);
                }
            }
            Multiplicative => {
                self.push_seq(vec![N(Unary), N(MultiplicativeTail), R(Reduce::Multiplicative)]);
            }
            MultiplicativeTail => {
                let kind = self.peek_kind();
                if matches!(kind, TokenKind::MultOp | TokenKind::DivideOp | TokenKind::ModOp) {
                    self.push_seq(vec![
                        StackSym::Tc(kind),
                        N(Unary),
                        N(MultiplicativeTail),
                        R(Reduce::MultiplicativeTailCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::MultiplicativeTailNil)]);
                }
            }
            // `Unary := ("-"|"$"|"?"|"@"|"#") Index | ("++"|"--") Assignable
            // | "not" Index | Index ("++"|"--")?`.
            Unary => {
                let kind = self.peek_kind();
                if matches!(kind, TokenKind::IncrementOp | TokenKind::DecrementOp) {
                    self.push_seq(vec![
                        StackSym::Tc(kind),
                        N(Postfix),
                        R(Reduce::Assignable),
                        R(Reduce::UnaryPrefix),
                    ]);
                } else if matches!(
                    kind,
                    TokenKind::MinusOp
                        | TokenKind::NotKw
                        | TokenKind::StringifyOp
                        | TokenKind::BooleanOp
                        | TokenKind::RoundOp
                        | TokenKind::LengthOp
                ) {
                    self.push_seq(vec![StackSym::Tc(kind), N(Postfix), R(Reduce::UnaryPrefix)]);
                } else {
                    self.push_seq(vec![N(Postfix), N(PostfixIncDecOpt)]);
                }
            }
            PostfixIncDecOpt => {
                let kind = self.peek_kind();
                if matches!(kind, TokenKind::IncrementOp | TokenKind::DecrementOp) {
                    self.push_seq(vec![R(Reduce::Assignable), StackSym::Tc(kind), R(Reduce::UnaryPostfix)]);
                } else {
                    self.push_seq(vec![R(Reduce::Noop)]);
                }
            }
            // `Index := Primary ("[" Or "]")*`.
            Postfix => {
                self.push_seq(vec![N(Primary), N(PostfixTail), R(Reduce::Index)]);
            }
            PostfixTail => {
                if self.peek_kind() == TokenKind::LeftSquarePr {
                    self.push_seq(vec![
                        T(TokenKind::LeftSquarePr),
                        N(Or),
                        T(TokenKind::RightSquarePr),
                        N(PostfixTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            Primary => {
                let tok = self.peek().clone();
                match tok.kind {
                    TokenKind::IdSy => self.push_seq(vec![StackSym::Tc(TokenKind::IdSy), N(CallTail)]),
                    TokenKind::IntegerNum => {
                        self.push_seq(vec![StackSym::Tc(TokenKind::IntegerNum), R(Reduce::IntegerLit)])
                    }
                    TokenKind::FloatNum => {
                        self.push_seq(vec![StackSym::Tc(TokenKind::FloatNum), R(Reduce::FloatLit)])
                    }
                    TokenKind::StringSy => {
                        self.push_seq(vec![StackSym::Tc(TokenKind::StringSy), R(Reduce::StringLit)])
                    }
                    TokenKind::TrueKw => self.push_seq(vec![StackSym::Tc(TokenKind::TrueKw), R(Reduce::BooleanLit)]),
                    TokenKind::FalseKw => {
                        self.push_seq(vec![StackSym::Tc(TokenKind::FalseKw), R(Reduce::BooleanLit)])
                    }
                    TokenKind::LeftCurlyPr => self.push_seq(vec![
                        StackSym::Tc(TokenKind::LeftCurlyPr),
                        N(ArrayElems),
                        StackSym::Tc(TokenKind::RightCurlyPr),
                        R(Reduce::ArrayLit),
                    ]),
                    TokenKind::LeftPr => self.push_seq(vec![
                        T(TokenKind::LeftPr),
                        N(Expr),
                        T(TokenKind::RightPr),
                        R(Reduce::Group),
                    ]),
                    TokenKind::Error => return Err(self.wrap_lexical_error(&tok)),
                    other => {
                        return Err(self.error(format!("expected an expression, found {:?}", other), tok.span));
                    }
                }
            }
            CallTail => {
                if self.peek_kind() == TokenKind::LeftPr {
                    self.push_seq(vec![
                        T(TokenKind::LeftPr),
                        N(ArgList),
                        StackSym::Tc(TokenKind::RightPr),
                        R(Reduce::Call),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::NoCall)]);
                }
            }
            ArgList => {
                if starts_expr(self.peek_kind()) {
                    self.push_seq(vec![N(Or), N(ArgListTail), R(Reduce::ExprListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            ArgListTail => {
                if self.peek_kind() == TokenKind::CommaSy {
                    self.push_seq(vec![
                        T(TokenKind::CommaSy),
                        N(Or),
                        N(ArgListTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            ArrayElems => {
                if starts_expr(self.peek_kind()) {
                    self.push_seq(vec![N(Or), N(ArrayElemsTail), R(Reduce::ExprListCons)]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
            ArrayElemsTail => {
                if self.peek_kind() == TokenKind::CommaSy {
                    self.push_seq(vec![
                        T(TokenKind::CommaSy),
                        N(Or),
                        N(ArrayElemsTail),
                        R(Reduce::ExprListCons),
                    ]);
                } else {
                    self.push_seq(vec![R(Reduce::ExprListNil)]);
                }
            }
        }
        Ok(())
    }

    // ---- reduce actions: pop a production's pieces (reverse of their
    // left-to-right order) and push the built fragment back ----

    fn reduce(&mut self, r: Reduce) -> PResult<()> {
        match r {
            Reduce::Source => {
                let program = self.pop_program();
                let functions = self.pop_func_list();
                let span = match functions.first() {
                    Some(f) => f.span.merge(program.span),
                    None => program.span,
                };
                self.value_stack.push(Value::Source(Source { program, functions, span }));
            }
            Reduce::Program => {
                let end = self.pop_tok();
                let body = self.pop_stmt_list();
                let globals = self.pop_var_def_list();
                let name = self.pop_tok();
                let start = self.pop_tok();
                self.value_stack.push(Value::Program(ProgramDecl {
                    name: name.lexeme,
                    globals,
                    body,
                    span: start.span.merge(end.span),
                }));
            }
            Reduce::FuncListNil => self.value_stack.push(Value::FuncList(Vec::new())),
            Reduce::FuncListCons => {
                let rest = self.pop_func_list();
                let f = self.pop_func();
                let mut v = vec![f];
                v.extend(rest);
                self.value_stack.push(Value::FuncList(v));
            }
            Reduce::Func => {
                let end = self.pop_tok();
                let body = self.pop_stmt_list();
                let parameters = self.pop_var_def_list();
                let name = self.pop_tok();
                let return_type = self.pop_type();
                let start = self.pop_tok();
                self.value_stack.push(Value::Func(FunctionDecl {
                    name: name.lexeme,
                    return_type,
                    parameters,
                    body,
                    span: start.span.merge(end.span),
                }));
            }
            Reduce::TypeBase => {
                let tok = self.pop_tok();
                let base = match tok.kind {
                    TokenKind::IntegerTy => PrimType::Integer,
                    TokenKind::BooleanTy => PrimType::Boolean,
                    TokenKind::FloatTy => PrimType::Float,
                    TokenKind::StringTy => PrimType::String,
                    TokenKind::VoidTy => PrimType::Void,
                    other => unreachable!("not a type token: {:?}", other),
                };
                self.value_stack.push(Value::Type(TypeName { base, dim: 0 }));
            }
            Reduce::TypeWrap => {
                let inner = self.pop_type();
                self.value_stack.push(Value::Type(TypeName { base: inner.base, dim: inner.dim + 1 }));
            }
            Reduce::VarDefListNil => self.value_stack.push(Value::VarDefList(Vec::new())),
            Reduce::VarDefListCons => {
                let rest = self.pop_var_def_list();
                let v = self.pop_var_def();
                let mut list = vec![v];
                list.extend(rest);
                self.value_stack.push(Value::VarDefList(list));
            }
            Reduce::VarDefDeclaration => {
                let semi = self.pop_tok();
                let datatype = self.pop_type();
                let rest = self.pop_name_list();
                let first = self.pop_tok();
                let var_kw = self.pop_tok();
                let mut names = vec![first.lexeme];
                names.extend(rest);
                let span = var_kw.span.merge(semi.span);
                self.value_stack.push(Value::VarDef(VarDef::Declaration { names, datatype }, span));
            }
            Reduce::VarDefInitialization => {
                let semi = self.pop_tok();
                let initializer = Box::new(self.pop_expr());
                let datatype = self.pop_type();
                let _rest = self.pop_name_list();
                let first = self.pop_tok();
                let var_kw = self.pop_tok();
                let span = var_kw.span.merge(semi.span);
                self.value_stack.push(Value::VarDef(
                    VarDef::Initialization { name: first.lexeme, datatype, initializer },
                    span,
                ));
            }
            Reduce::NameListNil => self.value_stack.push(Value::NameList(Vec::new())),
            Reduce::NameListCons => {
                let rest = self.pop_name_list();
                let id = self.pop_tok();
                let mut v = vec![id.lexeme];
                v.extend(rest);
                self.value_stack.push(Value::NameList(v));
            }
            Reduce::StmtListNil => self.value_stack.push(Value::StmtList(Vec::new())),
            Reduce::StmtListCons => {
                let rest = self.pop_stmt_list();
                let s = self.pop_stmt();
                let mut v = vec![s];
                v.extend(rest);
                self.value_stack.push(Value::StmtList(v));
            }
            Reduce::IfPlain => {
                let end = self.pop_tok();
                let consequent = self.pop_stmt_list();
                let condition = Box::new(self.pop_expr());
                let start = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::If { condition, consequent, alternate: Vec::new() },
                    start.span.merge(end.span),
                )));
            }
            Reduce::IfElseBlock => {
                let end = self.pop_tok();
                let alternate = self.pop_stmt_list();
                let consequent = self.pop_stmt_list();
                let condition = Box::new(self.pop_expr());
                let start = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::If { condition, consequent, alternate },
                    start.span.merge(end.span),
                )));
            }
            Reduce::IfElseIf => {
                let nested = self.pop_stmt();
                let consequent = self.pop_stmt_list();
                let condition = Box::new(self.pop_expr());
                let start = self.pop_tok();
                let span = start.span.merge(nested.span);
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::If { condition, consequent, alternate: vec![nested] },
                    span,
                )));
            }
            Reduce::ReturnVoid => {
                let semi = self.pop_tok();
                let start = self.pop_tok();
                self.value_stack
                    .push(Value::Stmt(Stmt::new(StmtKind::Return { value: None }, start.span.merge(semi.span))));
            }
            Reduce::ReturnWithValue => {
                let semi = self.pop_tok();
                let value = Box::new(self.pop_expr());
                let start = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::Return { value: Some(value) },
                    start.span.merge(semi.span),
                )));
            }
            Reduce::Skip => {
                let tok = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(StmtKind::Skip, tok.span)));
            }
            Reduce::Stop => {
                let tok = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(StmtKind::Stop, tok.span)));
            }
            Reduce::Read => {
                let semi = self.pop_tok();
                let rest = self.pop_expr_list();
                let first = self.pop_expr();
                let start = self.pop_tok();
                let mut targets = vec![first];
                targets.extend(rest);
                self.value_stack
                    .push(Value::Stmt(Stmt::new(StmtKind::Read { targets }, start.span.merge(semi.span))));
            }
            Reduce::Write => {
                let semi = self.pop_tok();
                let rest = self.pop_expr_list();
                let first = self.pop_expr();
                let start = self.pop_tok();
                let mut args = vec![first];
                args.extend(rest);
                self.value_stack
                    .push(Value::Stmt(Stmt::new(StmtKind::Write { args }, start.span.merge(semi.span))));
            }
            Reduce::While => {
                let end = self.pop_tok();
                let body = self.pop_stmt_list();
                let condition = Box::new(self.pop_expr());
                let start = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::While { condition, body },
                    start.span.merge(end.span),
                )));
            }
            Reduce::For => {
                let end = self.pop_tok();
                let body = self.pop_stmt_list();
                let update = Box::new(self.pop_expr());
                let condition = Box::new(self.pop_expr());
                let init = Box::new(self.pop_expr());
                let start = self.pop_tok();
                self.value_stack.push(Value::Stmt(Stmt::new(
                    StmtKind::For { init, condition, update, body },
                    start.span.merge(end.span),
                )));
            }
            Reduce::IntAssign => {
                let value = Box::new(self.pop_expr());
                let name_tok = self.pop_tok();
                let span = name_tok.span.merge(value.span);
                let assignee = Box::new(Expr::new(ExprKind::Identifier(name_tok.lexeme), name_tok.span));
                self.push_expr(Expr::new(ExprKind::Assignment { assignee, value }, span));
            }
            Reduce::VarStmt => {
                let (def, span) = self.pop_var_def_with_span();
                self.value_stack.push(Value::Stmt(Stmt::new(StmtKind::VarDef(def), span)));
            }
            Reduce::AssignStmt => {
                let semi = self.pop_tok();
                let expr = self.pop_expr();
                let span = expr.span.merge(semi.span);
                self.value_stack.push(Value::Stmt(Stmt::new(StmtKind::Assign(Box::new(expr)), span)));
            }
            Reduce::Assignment => {
                let rhs = self.pop_expr();
                let lhs = self.pop_expr();
                if !matches!(lhs.kind, ExprKind::Identifier(_) | ExprKind::Index { .. }) {
                    return Err(self.error(
                        "Invalid left-hand side in assignment expression".to_string(),
                        lhs.span,
                    ));
                }
                let span = lhs.span.merge(rhs.span);
                self.push_expr(Expr::new(ExprKind::Assignment { assignee: Box::new(lhs), value: Box::new(rhs) }, span));
            }
            Reduce::Or => {
                let rest = self.pop_expr_list();
                let first = self.pop_expr();
                let mut left = first;
                for right in rest {
                    let span = left.span.merge(right.span);
                    left = Expr::new(ExprKind::Or { left: Box::new(left), right: Box::new(right) }, span);
                }
                self.push_expr(left);
            }
            Reduce::And => {
                let rest = self.pop_expr_list();
                let first = self.pop_expr();
                let mut left = first;
                for right in rest {
                    let span = left.span.merge(right.span);
                    left = Expr::new(ExprKind::And { left: Box::new(left), right: Box::new(right) }, span);
                }
                self.push_expr(left);
            }
            Reduce::EqualityTailNil => self.value_stack.push(Value::EqTail(Vec::new())),
            Reduce::EqualityTailCons => {
                let rest = self.pop_eq_tail();
                let right = self.pop_expr();
                let op_tok = self.pop_tok();
                let op = match op_tok.kind {
                    TokenKind::IsEqualOp => EqualityOp::Eq,
                    TokenKind::NotEqualOp => EqualityOp::Ne,
                    other => unreachable!("not an equality operator: {:?}", other),
                };
                let mut v = vec![(op, right)];
                v.extend(rest);
                self.value_stack.push(Value::EqTail(v));
            }
            Reduce::Equality => {
                let pairs = self.pop_eq_tail();
                let first = self.pop_expr();
                let mut left = first;
                for (op, right) in pairs {
                    let span = left.span.merge(right.span);
                    left = Expr::new(ExprKind::Equality { left: Box::new(left), right: Box::new(right), op }, span);
                }
                self.push_expr(left);
            }
            Reduce::RelationalTailNil => self.value_stack.push(Value::RelTail(Vec::new())),
            Reduce::RelationalTailCons => {
                let rest = self.pop_rel_tail();
                let right = self.pop_expr();
                let op_tok = self.pop_tok();
                let op = match op_tok.kind {
                    TokenKind::LessThanOp => RelationalOp::Lt,
                    TokenKind::LessEqualOp => RelationalOp::Le,
                    TokenKind::GreaterThanOp => RelationalOp::Gt,
                    TokenKind::GreaterEqualOp => RelationalOp::Ge,
                    other => unreachable!("not a relational operator: {:?}", other),
                };
                let mut v = vec![(op, right)];
                v.extend(rest);
                self.value_stack.push(Value::RelTail(v));
            }
            Reduce::Relational => {
                let pairs = self.pop_rel_tail();
                let first = self.pop_expr();
                let mut left = first;
                for (op, right) in pairs {
                    let span = left.span.merge(right.span);
                    left = Expr::new(ExprKind::Relational { left: Box::new(left), right: Box::new(right), op }, span);
                }
                self.push_expr(left);
            }
            Reduce::AdditiveTailNil => self.value_stack.push(Value::AddTail(Vec::new())),
            Reduce::AdditiveTailCons => {
                let rest = self.pop_add_tail();
                let right = self.pop_expr();
                let op_tok = self.pop_tok();
                let op = match op_tok.kind {
                    TokenKind::PlusOp => AdditiveOp::Add,
                    TokenKind::MinusOp => AdditiveOp::Sub,
                    other => unreachable!("not an additive operator: {:?}", other),
                };
                let mut v = vec![(op, right)];
                v.extend(rest);
                self.value_stack.push(Value::AddTail(v));
            }
            Reduce::Additive => {
                let pairs = self.pop_add_tail();
                let first = self.pop_expr();
                let mut left = first;
                for (op, right) in pairs {
                    let span = left.span.merge(right.span);
                    left = Expr::new(ExprKind::Additive { left: Box::new(left), right: Box::new(right), op }, span);
                }
                self.push_expr(left);
            }
            Reduce::MultiplicativeTailNil => self.value_stack.push(Value::MulTail(Vec::new())),
            Reduce::MultiplicativeTailCons => {
                let rest = self.pop_mul_tail();
                let right = self.pop_expr();
                let op_tok = self.pop_tok();
                let op = match op_tok.kind {
                    TokenKind::MultOp => MultiplicativeOp::Mul,
                    TokenKind::DivideOp => MultiplicativeOp::Div,
                    TokenKind::ModOp => MultiplicativeOp::Mod,
                    other => unreachable!("not a multiplicative operator: {:?}", other),
                };
                let mut v = vec![(op, right)];
                v.extend(rest);
                self.value_stack.push(Value::MulTail(v));
            }
            Reduce::Multiplicative => {
                let pairs = self.pop_mul_tail();
                let first = self.pop_expr();
                let mut left = first;
                for (op, right) in pairs {
                    let span = left.span.merge(right.span);
                    left = Expr::new(
                        ExprKind::Multiplicative { left: Box::new(left), right: Box::new(right), op },
                        span,
                    );
                }
                self.push_expr(left);
            }
            Reduce::UnaryPrefix => {
                let operand = Box::new(self.pop_expr());
                let op_tok = self.pop_tok();
                let op = unary_op_of(op_tok.kind);
                let span = op_tok.span.merge(operand.span);
                self.push_expr(Expr::new(ExprKind::Unary { operand, op, postfix: false }, span));
            }
            Reduce::UnaryPostfix => {
                let op_tok = self.pop_tok();
                let operand = Box::new(self.pop_expr());
                let op = unary_op_of(op_tok.kind);
                let span = operand.span.merge(op_tok.span);
                self.push_expr(Expr::new(ExprKind::Unary { operand, op, postfix: true }, span));
            }
            Reduce::Noop => {}
            Reduce::Assignable => self.check_assignable_top()?,
            Reduce::Index => {
                let indices = self.pop_expr_list();
                let base = self.pop_expr();
                let mut result = base;
                for idx in indices {
                    let span = result.span.merge(idx.span);
                    result = Expr::new(ExprKind::Index { base: Box::new(result), index: Box::new(idx) }, span);
                }
                self.push_expr(result);
            }
            Reduce::Call => {
                let end = self.pop_tok();
                let args = self.pop_expr_list();
                let name = self.pop_tok();
                let span = name.span.merge(end.span);
                self.push_expr(Expr::new(ExprKind::Call { function: name.lexeme, arguments: args }, span));
            }
            Reduce::NoCall => {
                let name = self.pop_tok();
                self.push_expr(Expr::new(ExprKind::Identifier(name.lexeme), name.span));
            }
            Reduce::ExprListNil => self.value_stack.push(Value::ExprList(Vec::new())),
            Reduce::ExprListCons => {
                let rest = self.pop_expr_list();
                let e = self.pop_expr();
                let mut v = vec![e];
                v.extend(rest);
                self.value_stack.push(Value::ExprList(v));
            }
            Reduce::IntegerLit => {
                let tok = self.pop_tok();
                let value: i64 = tok
                    .lexeme
                    .parse()
                    .map_err(|_| self.error(format!("invalid integer literal '{}'", tok.lexeme), tok.span))?;
                self.push_expr(Expr::new(ExprKind::IntegerLit(value), tok.span));
            }
            Reduce::FloatLit => {
                let tok = self.pop_tok();
                let value: f64 = tok
                    .lexeme
                    .parse()
                    .map_err(|_| self.error(format!("invalid float literal '{}'", tok.lexeme), tok.span))?;
                self.push_expr(Expr::new(ExprKind::FloatLit(value), tok.span));
            }
            Reduce::StringLit => {
                let tok = self.pop_tok();
                self.push_expr(Expr::new(ExprKind::StringLit(tok.lexeme), tok.span));
            }
            Reduce::BooleanLit => {
                let tok = self.pop_tok();
                let value = tok.kind == TokenKind::TrueKw;
                self.push_expr(Expr::new(ExprKind::BooleanLit(value), tok.span));
            }
            Reduce::ArrayLit => {
                let end = self.pop_tok();
                let elements = self.pop_expr_list();
                let start = self.pop_tok();
                self.push_expr(Expr::new(ExprKind::ArrayLit(elements), start.span.merge(end.span)));
            }
            Reduce::Group => {
                // Span deliberately stays the inner expression's own span,
                // matching the recursive-descent parser (the parens aren't
                // folded into it).
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{HandCoded, Scanner};
    use crate::parser::RecursiveDescent;

    fn parse_ll1(src: &str) -> PResult<Source> {
        let tokens = HandCoded::new(src).tokenize_all();
        Ll1::parse(tokens)
    }

    fn parse_rd(src: &str) -> PResult<Source> {
        let tokens = HandCoded::new(src).tokenize_all();
        RecursiveDescent::parse(tokens)
    }

    const SAMPLES: &[&str] = &[
        "program demo is begin end",
        "program demo is begin var x : integer; x = 1; end",
        "program demo is begin if a then skip; else if b then stop; end if end",
        "program demo is begin var a : [integer]; a[0] = 1; end",
        "func integer add has var x : integer; var y : integer; \
         begin return x + y; end func \
         program demo is begin write add(1, 2); end",
        "program demo is begin \
         var x, y : integer; \
         write x + y * 2 - 1; \
         while x < 10 do x = x + 1; end while \
         for i = 0; i < 10; i++ do write i; end for \
         read x; \
         var z : boolean = x == y and not y or true; \
         end",
    ];

    #[test]
    fn agrees_with_recursive_descent_on_valid_programs() {
        for src in SAMPLES {
            let ll1 = parse_ll1(src).unwrap_or_else(|e| panic!("ll1 failed on {:?}: {:?}", src, e));
            let rd = parse_rd(src).unwrap_or_else(|e| panic!("recursive descent failed on {:?}: {:?}", src, e));
            assert_eq!(ll1, rd, "ast mismatch for {:?}", src);
        }
    }

    #[test]
    fn latches_same_first_fault_phase_on_missing_end() {
        let src = "program demo is begin";
        let ll1_err = parse_ll1(src).unwrap_err();
        let rd_err = parse_rd(src).unwrap_err();
        assert_eq!(ll1_err.phase, rd_err.phase);
    }

    #[test]
    fn wraps_lexical_fault_as_syntax_same_as_recursive_descent() {
        let src = "program demo is begin var x : integer = `; end";
        let ll1_err = parse_ll1(src).unwrap_err();
        let rd_err = parse_rd(src).unwrap_err();
        assert_eq!(ll1_err.phase, Phase::Syntax);
        assert_eq!(rd_err.phase, Phase::Syntax);
    }

    #[test]
    fn rejects_non_assignable_left_hand_side_same_as_recursive_descent() {
        let src = "program demo is begin 1 = 2; end";
        assert!(parse_ll1(src).is_err());
        assert!(parse_rd(src).is_err());
    }

    #[test]
    fn rejects_non_assignable_read_target_same_as_recursive_descent() {
        let src = "program demo is begin read 1; end";
        assert!(parse_ll1(src).is_err());
        assert!(parse_rd(src).is_err());
    }

    #[test]
    fn parses_function_with_parameters_and_call() {
        let source = parse_ll1(SAMPLES[4]).expect("should parse");
        assert_eq!(source.functions.len(), 1);
        assert_eq!(source.functions[0].parameters.len(), 2);
    }
}
