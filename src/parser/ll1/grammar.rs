//! Grammar symbols for the table-driven parser, ported from the shape of
//! `original_source/include/robin/syntax/ll1_parser.h`'s `SymbolLL1`
//! (terminal / non-terminal / reduce-marker sentinel).

use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Source,
    Program,
    FuncList,
    Func,
    Type,
    VarDefList,
    VarDef,
    VarDefTail,
    NameListTail,
    StmtList,
    Stmt,
    IfStmt,
    ElseClause,
    ElseBody,
    ReturnStmt,
    ReturnTail,
    ReadStmt,
    ReadTail,
    WriteStmt,
    ExprListTail,
    WhileStmt,
    ForStmt,
    IntAssign,
    VarStmt,
    AssignStmt,
    Expr,
    Assignment,
    AssignmentTail,
    Or,
    OrTail,
    And,
    AndTail,
    Equality,
    EqualityTail,
    Relational,
    RelationalTail,
    Additive,
    AdditiveTail,
    Multiplicative,
    MultiplicativeTail,
    Unary,
    Postfix,
    PostfixTail,
    PostfixIncDecOpt,
    Primary,
    CallTail,
    ArgList,
    ArgListTail,
    ArrayElems,
    ArrayElemsTail,
}

/// A reduce marker: when popped off the symbol stack, the driver builds
/// an AST fragment by popping already-built pieces off the parallel value
/// stack and pushes the result back — the same "synthesized reduce
/// action popping a growing node list" idiom
/// `original_source/include/robin/syntax/ll1_parser.h`'s `builder`
/// callback uses. List-valued non-terminals (`FuncList`, `StmtList`, the
/// binary-operator tails, ...) all follow the same cons/nil shape: a
/// `*Cons` reduce prepends one completed element onto the already-built
/// rest of the list, a `*Nil` reduce starts the list empty, so the list
/// comes out in left-to-right order with no final reversal pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    Source,
    Program,
    FuncListCons,
    FuncListNil,
    Func,
    /// `Type := Primitive` — the base case of the prefix-bracket recursion.
    TypeBase,
    /// `ArrayType := "[" ArrayType "]" | "[" Primitive "]"` — wraps an
    /// already-built `Type` in one more array dimension.
    TypeWrap,
    VarDefListCons,
    VarDefListNil,
    VarDefDeclaration,
    VarDefInitialization,
    NameListCons,
    NameListNil,
    StmtListCons,
    StmtListNil,
    IfPlain,
    IfElseBlock,
    IfElseIf,
    ReturnWithValue,
    ReturnVoid,
    Skip,
    Stop,
    Read,
    Write,
    ExprListCons,
    ExprListNil,
    While,
    For,
    IntAssign,
    VarStmt,
    AssignStmt,
    Assignment,
    Or,
    And,
    EqualityTailCons,
    EqualityTailNil,
    Equality,
    RelationalTailCons,
    RelationalTailNil,
    Relational,
    AdditiveTailCons,
    AdditiveTailNil,
    Additive,
    MultiplicativeTailCons,
    MultiplicativeTailNil,
    Multiplicative,
    UnaryPrefix,
    UnaryPostfix,
    /// Leaves the value stack untouched — the "optional tail turned out
    /// to be absent" case (no trailing `=`, no postfix `++`/`--`, ...).
    Noop,
    /// Validates that the `Expr` on top of the value stack is an
    /// `Assignable` (bare identifier or indexed identifier), in place —
    /// used by `read` targets and by prefix/postfix `++`/`--` operands.
    Assignable,
    Index,
    Call,
    NoCall,
    IntegerLit,
    FloatLit,
    StringLit,
    BooleanLit,
    ArrayLit,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackSym {
    /// Match and discard — the token carries no payload a later reduce
    /// needs (e.g. the `has`/`begin` structural keywords).
    T(TokenKind),
    /// Match and push the matched `Token` onto the value stack — used
    /// wherever a later reduce needs the lexeme or span (identifiers,
    /// literals, operators, and the start/end keyword of a span).
    Tc(TokenKind),
    N(NonTerminal),
    R(Reduce),
}
