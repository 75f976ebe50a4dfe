//! End-to-end scenarios driving the full scan → parse → analyze pipeline
//! through the public API, plus the cross-cutting properties that must
//! hold for any input (scanner parity, parser parity, span monotonicity,
//! initialization monotonicity).

use robin_compiler::ast::{ExprKind, StmtKind, VarDef};
use robin_compiler::config::{CompilerOptions, ParserKind, ScannerKind};
use robin_compiler::error::Phase;
use robin_compiler::lexer::{FiniteAutomaton, HandCoded, Scanner};
use robin_compiler::parser::{Ll1, Parser, RecursiveDescent};
use robin_compiler::pipeline;

fn run(src: &str) -> pipeline::AnalysisResult {
    pipeline::compile(&CompilerOptions::new(src)).expect("expected a parseable program")
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ═══════════════════════════════════════════════════════════════════

#[test]
fn hello_world_accepted_with_no_diagnostic() {
    let result = run(r#"program hi is begin write "x"; end"#);
    assert!(result.diagnostic.is_none());
    assert_eq!(result.ast.program.name, "hi");
    assert!(result.ast.functions.is_empty());
    assert_eq!(result.ast.program.body.len(), 1);
    match &result.ast.program.body[0].kind {
        StmtKind::Write { args } => {
            assert_eq!(args.len(), 1);
            assert!(matches!(args[0].kind, ExprKind::StringLit(ref s) if s == "x"));
        }
        other => panic!("expected a write statement, got {:?}", other),
    }
}

#[test]
fn duplicate_global_name_is_rejected() {
    let result = run("program p is var x, x : integer; begin end");
    let diagnostic = result.diagnostic.expect("expected a latched fault");
    assert_eq!(diagnostic.phase, Phase::Semantic);
    assert!(diagnostic.message.contains("already exists"), "{}", diagnostic.message);
    assert!(diagnostic.message.contains('x'), "{}", diagnostic.message);
}

#[test]
fn uninitialized_use_is_rejected() {
    let result = run("program p is var x : integer; begin write x; end");
    let diagnostic = result.diagnostic.expect("expected a latched fault");
    assert!(diagnostic.message.contains("must be Initialized"), "{}", diagnostic.message);
}

#[test]
fn dimension_mismatch_is_rejected() {
    let result = run(
        "program p is begin \
         var a : [integer] = {1, 2}; \
         var b : [[integer]] = {{1, 2}, {3}}; \
         a = b; \
         end",
    );
    let diagnostic = result.diagnostic.expect("expected a latched fault");
    assert!(diagnostic.message.contains("datatype and same dimension"), "{}", diagnostic.message);
}

#[test]
fn dangling_else_folds_into_a_single_nested_if() {
    let result = run(
        "program p is var x : integer; \
         begin \
         if true then x = 1; \
         else if false then x = 2; else x = 3; end if \
         end",
    );
    assert!(result.diagnostic.is_none(), "{:?}", result.diagnostic);
    let top = &result.ast.program.body[0];
    match &top.kind {
        StmtKind::If { alternate, .. } => {
            assert_eq!(alternate.len(), 1);
            match &alternate[0].kind {
                StmtKind::If { alternate: inner_alt, .. } => {
                    assert_eq!(inner_alt.len(), 1);
                    assert!(matches!(inner_alt[0].kind, StmtKind::Assign(_)));
                }
                other => panic!("expected folded else-if, got {:?}", other),
            }
        }
        other => panic!("expected an if statement, got {:?}", other),
    }
}

#[test]
fn array_length_via_hash_is_accepted() {
    let result = run(
        "program p is var a : [[integer]] = {{1,2},{3}}; \
         begin write #a; write #a[0]; end",
    );
    assert!(result.diagnostic.is_none(), "{:?}", result.diagnostic);
}

// ═══════════════════════════════════════════════════════════════════
// Cross-cutting properties (spec §8)
// ═══════════════════════════════════════════════════════════════════

const PARITY_PROGRAMS: &[&str] = &[
    "program demo is begin end",
    "program demo is var x : integer; begin x = 1; write x; end",
    "program demo is var x : [integer] = {1, 2, 3}; begin write #x; end",
    "func integer add has var a : integer; var b : integer; \
     begin return a + b; end func \
     program demo is begin write add(1, 2); end",
    "program demo is var x : integer; begin \
       if x > 0 then write x; else write 0; end if \
     end",
    "program demo is var i : integer; begin \
       for i = 0; i < 10; i++ do write i; end for \
     end",
];

#[test]
fn scanner_parity_across_hand_coded_and_finite_automaton() {
    for src in PARITY_PROGRAMS {
        let a = HandCoded::new(src).tokenize_all();
        let b = FiniteAutomaton::new(src).tokenize_all();
        assert_eq!(a.len(), b.len(), "token count mismatch for {:?}", src);
        for (ta, tb) in a.iter().zip(b.iter()) {
            assert_eq!(ta.kind, tb.kind, "kind mismatch for {:?}", src);
            assert_eq!(ta.lexeme, tb.lexeme, "lexeme mismatch for {:?}", src);
            assert_eq!(ta.span, tb.span, "span mismatch for {:?}", src);
        }
    }
}

#[test]
fn parser_parity_across_recursive_descent_and_ll1() {
    for src in PARITY_PROGRAMS {
        let tokens_a = HandCoded::new(src).tokenize_all();
        let tokens_b = HandCoded::new(src).tokenize_all();
        let ast_a = RecursiveDescent::parse(tokens_a).unwrap_or_else(|e| panic!("{:?}: {}", src, e));
        let ast_b = Ll1::parse(tokens_b).unwrap_or_else(|e| panic!("{:?}: {}", src, e));
        assert_eq!(ast_a, ast_b, "AST mismatch for {:?}", src);
    }
}

#[test]
fn span_monotonicity_holds_for_every_node() {
    fn check_expr(e: &robin_compiler::ast::Expr) {
        assert!(e.span.start <= e.span.end);
        match &e.kind {
            ExprKind::Assignment { assignee, value } => {
                check_expr(assignee);
                check_expr(value);
            }
            ExprKind::Or { left, right }
            | ExprKind::And { left, right }
            | ExprKind::Equality { left, right, .. }
            | ExprKind::Relational { left, right, .. }
            | ExprKind::Additive { left, right, .. }
            | ExprKind::Multiplicative { left, right, .. } => {
                check_expr(left);
                check_expr(right);
                assert!(left.span.start >= e.span.start && right.span.end <= e.span.end);
            }
            ExprKind::Unary { operand, .. } => check_expr(operand),
            ExprKind::Call { arguments, .. } => arguments.iter().for_each(check_expr),
            ExprKind::Index { base, index } => {
                check_expr(base);
                check_expr(index);
            }
            ExprKind::ArrayLit(elements) => elements.iter().for_each(check_expr),
            ExprKind::Identifier(_)
            | ExprKind::IntegerLit(_)
            | ExprKind::FloatLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BooleanLit(_) => {}
        }
    }

    fn check_stmt(s: &robin_compiler::ast::Stmt) {
        assert!(s.span.start <= s.span.end);
        match &s.kind {
            StmtKind::If { condition, consequent, alternate } => {
                check_expr(condition);
                consequent.iter().for_each(check_stmt);
                alternate.iter().for_each(check_stmt);
            }
            StmtKind::Return { value } => {
                if let Some(v) = value {
                    check_expr(v);
                }
            }
            StmtKind::Read { targets } => targets.iter().for_each(check_expr),
            StmtKind::Skip | StmtKind::Stop => {}
            StmtKind::Write { args } => args.iter().for_each(check_expr),
            StmtKind::While { condition, body } => {
                check_expr(condition);
                body.iter().for_each(check_stmt);
            }
            StmtKind::For { init, condition, update, body } => {
                check_expr(init);
                check_expr(condition);
                check_expr(update);
                body.iter().for_each(check_stmt);
            }
            StmtKind::VarDef(VarDef::Initialization { initializer, .. }) => check_expr(initializer),
            StmtKind::VarDef(VarDef::Declaration { .. }) => {}
            StmtKind::Assign(expr) => check_expr(expr),
        }
    }

    for src in PARITY_PROGRAMS {
        let tokens = HandCoded::new(src).tokenize_all();
        let ast = RecursiveDescent::parse(tokens).unwrap_or_else(|e| panic!("{:?}: {}", src, e));
        assert!(ast.span.start <= ast.span.end);
        ast.program.body.iter().for_each(check_stmt);
        for func in &ast.functions {
            func.body.iter().for_each(check_stmt);
        }
    }
}

#[test]
fn round_trip_identifier_lookup_finds_a_consistent_symbol() {
    use robin_compiler::scope::ScopeStack;
    use robin_compiler::symbol::{PrimType, Symbol, TypeName, VariableSymbol};

    let result = run("program demo is var x : integer; begin x = 1; write x; end");
    assert!(result.diagnostic.is_none());

    let mut scopes = ScopeStack::new();
    scopes.insert(Symbol::Variable(VariableSymbol {
        name: "x".to_string(),
        ty: TypeName::scalar(PrimType::Integer),
        initialized: true,
    }));

    fn find_identifier(s: &robin_compiler::ast::Stmt) -> Option<&str> {
        match &s.kind {
            StmtKind::Write { args } => args.iter().find_map(|e| match &e.kind {
                ExprKind::Identifier(name) => Some(name.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    let name = result
        .ast
        .program
        .body
        .iter()
        .find_map(find_identifier)
        .expect("expected a write of an identifier");

    let symbol = scopes.lookup(name).expect("identifier must resolve in its scope");
    assert_eq!(symbol.type_of().base, PrimType::Integer);
}

#[test]
fn both_scanner_and_parser_selections_analyze_the_same_valid_program() {
    let src = "program demo is var x : integer; begin x = 1; write x; end";
    for scanner in [ScannerKind::HandCoded, ScannerKind::FiniteAutomaton] {
        for parser in [ParserKind::RecursiveDescent, ParserKind::Ll1] {
            let options = CompilerOptions::new(src)
                .with_scanner(scanner)
                .with_parser(parser);
            let result = pipeline::compile(&options).unwrap();
            assert!(result.diagnostic.is_none(), "{:?}/{:?}", scanner, parser);
        }
    }
}
