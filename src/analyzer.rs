//! Semantic analysis: scope/type checking over an [`ast::Source`] tree,
//! conceptually ported from `original_source/src/robin/semantic/semantic_analyzer.cpp`.
//!
//! Registration (program name, globals, function signatures) happens before
//! any function or program body is walked. Three registration faults abort
//! the whole analysis outright (required-after-optional parameters, a
//! duplicate parameter name, a duplicate function name) since nothing
//! downstream can be trusted once a signature is malformed. Every other
//! fault just latches the first [`Diagnostic`] and lets the walk continue,
//! so later statements still get whatever scope/initialization bookkeeping
//! they'd otherwise need — only the first message is ever reported.

use crate::ast::{
    AdditiveOp, Expr, ExprKind, FunctionDecl, MultiplicativeOp, ProgramDecl, Source, Stmt,
    StmtKind, UnaryOp, VarDef,
};
use crate::error::{Diagnostic, Phase};
use crate::scope::ScopeStack;
use crate::symbol::{FunctionSymbol, PrimType, Symbol, TypeName, VariableSymbol};
use crate::token::Span;
use crate::typeck;

/// Walks a [`Source`] tree, latching the first semantic fault it finds.
struct Analyzer {
    scopes: ScopeStack,
    error: Option<Diagnostic>,
}

impl Analyzer {
    fn new() -> Self {
        Analyzer {
            scopes: ScopeStack::new(),
            error: None,
        }
    }

    fn semantic_error(&mut self, span: Span, message: String) {
        if self.error.is_none() {
            self.error = Some(Diagnostic::new(Phase::Semantic, message, span));
        }
    }

    // ---- registration ----------------------------------------------------

    fn analyze_source(&mut self, source: &Source) {
        let program_name = source.program.name.clone();
        let inserted = self.scopes.insert(Symbol::Function(FunctionSymbol {
            name: program_name.clone(),
            return_type: TypeName::scalar(PrimType::Program),
            parameters: Vec::new(),
            required: 0,
        }));
        if !inserted {
            self.semantic_error(
                source.program.span,
                format!("Symbol '{}' already exists.", program_name),
            );
            return;
        }

        for var in &source.program.globals {
            self.var_def(var, source.program.span);
        }

        for func in &source.functions {
            if !self.register_function(func) {
                return;
            }
        }

        self.analyze_program(&source.program);
        for func in &source.functions {
            self.analyze_function(func);
        }
    }

    /// Registers one function's signature. Returns `false` when the fault
    /// is severe enough that the whole analysis must stop right here.
    fn register_function(&mut self, func: &FunctionDecl) -> bool {
        let mut flat: Vec<TypeName> = Vec::new();
        let mut declared_names: Vec<&str> = Vec::new();
        let mut required = 0usize;
        let mut seen_optional = false;

        for param in &func.parameters {
            match param {
                VarDef::Declaration { names, datatype } => {
                    if seen_optional {
                        self.semantic_error(
                            func.span,
                            "Required parameters cannot follow optional parameters".to_string(),
                        );
                        return false;
                    }
                    for name in names {
                        if declared_names.contains(&name.as_str()) {
                            self.semantic_error(
                                func.span,
                                format!("Duplicate parameter name '{}'.", name),
                            );
                            return false;
                        }
                        declared_names.push(name.as_str());
                        flat.push(*datatype);
                        required += 1;
                    }
                }
                VarDef::Initialization { name, datatype, .. } => {
                    seen_optional = true;
                    if declared_names.contains(&name.as_str()) {
                        self.semantic_error(
                            func.span,
                            format!("Duplicate parameter name '{}'.", name),
                        );
                        return false;
                    }
                    declared_names.push(name.as_str());
                    flat.push(*datatype);
                }
            }
        }

        let inserted = self.scopes.insert(Symbol::Function(FunctionSymbol {
            name: func.name.clone(),
            return_type: func.return_type,
            parameters: flat,
            required,
        }));
        if !inserted {
            self.semantic_error(func.span, format!("Symbol '{}' already exists.", func.name));
            return false;
        }

        true
    }

    fn var_def(&mut self, var: &VarDef, span: Span) {
        match var {
            VarDef::Declaration { names, datatype } => {
                for name in names {
                    let inserted = self.scopes.insert(Symbol::Variable(VariableSymbol {
                        name: name.clone(),
                        ty: *datatype,
                        initialized: false,
                    }));
                    if !inserted {
                        self.semantic_error(span, format!("Symbol '{}' already exists.", name));
                        return;
                    }
                }
            }
            VarDef::Initialization {
                name,
                datatype,
                initializer,
            } => {
                let dt_init = self.expr_type(initializer);
                let dim_init = self.expr_dimension(initializer);
                let result =
                    typeck::is_valid_assign(datatype.base, dt_init, datatype.dim, dim_init);
                if result == PrimType::Undefined {
                    self.semantic_error(initializer.span, "invalid initialization.".to_string());
                    return;
                }
                let inserted = self.scopes.insert(Symbol::Variable(VariableSymbol {
                    name: name.clone(),
                    ty: *datatype,
                    initialized: true,
                }));
                if !inserted {
                    self.semantic_error(
                        initializer.span,
                        format!("Symbol '{}' already exists.", name),
                    );
                }
            }
        }
    }

    // ---- bodies ------------------------------------------------------------

    fn analyze_program(&mut self, program: &ProgramDecl) {
        self.scopes.push_scope();
        for stmt in &program.body {
            self.command(stmt, &program.name);
        }
        self.scopes.pop_scope();
    }

    fn analyze_function(&mut self, func: &FunctionDecl) {
        self.scopes.push_scope();

        for param in &func.parameters {
            match param {
                VarDef::Initialization { .. } => self.var_def(param, func.span),
                VarDef::Declaration { names, datatype } => {
                    for name in names {
                        let inserted = self.scopes.insert(Symbol::Variable(VariableSymbol {
                            name: name.clone(),
                            ty: *datatype,
                            initialized: true,
                        }));
                        if !inserted {
                            self.semantic_error(
                                func.span,
                                format!("Symbol '{}' already exists.", name),
                            );
                            self.scopes.pop_scope();
                            return;
                        }
                    }
                }
            }
        }

        let requires_return = func.return_type.base != PrimType::Void;
        let mut has_return = false;
        for stmt in &func.body {
            self.command(stmt, &func.name);
            if requires_return && matches!(stmt.kind, StmtKind::Return { .. }) {
                has_return = true;
            }
        }

        if requires_return && !has_return {
            self.semantic_error(
                func.span,
                format!(
                    "missing a return statement in the function body in '{}'.",
                    func.name
                ),
            );
        }

        self.scopes.pop_scope();
    }

    fn command(&mut self, stmt: &Stmt, name_parent: &str) {
        match &stmt.kind {
            StmtKind::If {
                condition,
                consequent,
                alternate,
            } => self.if_stmt(condition, consequent, alternate, name_parent),
            StmtKind::Return { value } => {
                self.return_stmt(value.as_deref(), stmt.span, name_parent)
            }
            StmtKind::Read { targets } => self.read_stmt(targets),
            StmtKind::Write { args } => self.write_stmt(args),
            StmtKind::While { condition, body } => self.while_stmt(condition, body, name_parent),
            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => self.for_stmt(init, condition, update, body, name_parent),
            StmtKind::Assign(expr) => {
                self.expr_type(expr);
            }
            StmtKind::VarDef(var) => self.var_def(var, stmt.span),
            StmtKind::Skip | StmtKind::Stop => {}
        }
    }

    fn if_stmt(&mut self, condition: &Expr, consequent: &[Stmt], alternate: &[Stmt], name_parent: &str) {
        self.scopes.push_scope();
        let ty = self.expr_type(condition);
        if ty != PrimType::Boolean {
            self.semantic_error(condition.span, "condition must be boolean".to_string());
        } else {
            for stmt in consequent {
                self.command(stmt, name_parent);
            }
        }
        self.scopes.pop_scope();

        self.scopes.push_scope();
        for stmt in alternate {
            self.command(stmt, name_parent);
        }
        self.scopes.pop_scope();
    }

    fn while_stmt(&mut self, condition: &Expr, body: &[Stmt], name_parent: &str) {
        self.scopes.push_scope();
        let ty = self.expr_type(condition);
        if ty != PrimType::Boolean {
            self.semantic_error(condition.span, "condition must be boolean".to_string());
        } else {
            for stmt in body {
                self.command(stmt, name_parent);
            }
        }
        self.scopes.pop_scope();
    }

    fn for_stmt(&mut self, init: &Expr, condition: &Expr, update: &Expr, body: &[Stmt], name_parent: &str) {
        self.scopes.push_scope();
        self.for_init_assign(init);

        let ty = self.expr_type(condition);
        if ty != PrimType::Boolean {
            self.semantic_error(condition.span, "condition must be boolean".to_string());
            self.scopes.pop_scope();
            return;
        }

        let ty_update = self.expr_type(update);
        if ty_update != PrimType::Integer {
            self.semantic_error(update.span, "Update for loop must be integer".to_string());
            self.scopes.pop_scope();
            return;
        }

        for stmt in body {
            self.command(stmt, name_parent);
        }
        self.scopes.pop_scope();
    }

    /// The for-loop's own `i = 0`-shaped initializer: the target must be a
    /// bare identifier, fresh across the *whole* call stack (not just the
    /// loop's own frame), and bound as an initialized `Integer`.
    fn for_init_assign(&mut self, init: &Expr) {
        let (assignee, value) = match &init.kind {
            ExprKind::Assignment { assignee, value } => (assignee.as_ref(), value.as_ref()),
            _ => {
                self.semantic_error(
                    init.span,
                    "in initialization part of forLoop must be identifier .".to_string(),
                );
                return;
            }
        };

        let name = match &assignee.kind {
            ExprKind::Identifier(name) => name.clone(),
            _ => {
                self.semantic_error(
                    init.span,
                    "in initialization part of forLoop must be identifier .".to_string(),
                );
                return;
            }
        };

        if self.scopes.is_exist(&name) {
            self.semantic_error(assignee.span, format!("Symbol '{}' Declared.", name));
            return;
        }

        let inserted = self.scopes.insert(Symbol::Variable(VariableSymbol {
            name: name.clone(),
            ty: TypeName::scalar(PrimType::Integer),
            initialized: true,
        }));
        if !inserted {
            self.semantic_error(assignee.span, format!("Symbol '{}' already exists.", name));
            return;
        }

        let ty = self.expr_type(value);
        if ty != PrimType::Integer {
            self.semantic_error(value.span, format!("Value of '{}' Must be integer.", name));
        }
    }

    fn return_stmt(&mut self, value: Option<&Expr>, span: Span, name_parent: &str) {
        let func_type = self
            .scopes
            .lookup_function(name_parent)
            .and_then(Symbol::as_function)
            .map(|f| f.return_type)
            .unwrap_or_else(|| TypeName::scalar(PrimType::Undefined));

        let return_type = match value {
            Some(v) => self.expr_type(v),
            None => PrimType::Undefined,
        };

        if func_type.base == PrimType::Void || func_type.base == PrimType::Program {
            if return_type != PrimType::Undefined {
                self.semantic_error(
                    span,
                    format!("'return' in block '{}' must not have an expression.", name_parent),
                );
                return;
            }
        } else if func_type.base != return_type
            && !(typeck::is_number(func_type.base) && typeck::is_number(return_type))
        {
            self.semantic_error(
                span,
                format!("'return' in function block '{}' doesn't match the function type.", name_parent),
            );
            return;
        }

        let dim_return = match value {
            Some(v) => self.expr_dimension(v),
            None => 0,
        };

        if func_type.dim != dim_return {
            self.semantic_error(
                span,
                format!(
                    "'return' in function block '{}' doesn't match the function dimensions.",
                    name_parent
                ),
            );
        }
    }

    fn read_stmt(&mut self, targets: &[Expr]) {
        for target in targets {
            self.assignable_expr_type(target);
        }
    }

    fn write_stmt(&mut self, args: &[Expr]) {
        for expr in args {
            self.expr_type(expr);
            self.is_array_operand(expr);
        }
    }

    // ---- expressions ---------------------------------------------------

    fn expr_type(&mut self, expr: &Expr) -> PrimType {
        match &expr.kind {
            ExprKind::Assignment { assignee, value } => self.assignment_type(expr, assignee, value),
            ExprKind::Or { left, right } => self.or_and_type(expr, left, right, true),
            ExprKind::And { left, right } => self.or_and_type(expr, left, right, false),
            ExprKind::Equality { left, right, .. } => self.equality_type(expr, left, right),
            ExprKind::Relational { left, right, .. } => self.relational_type(expr, left, right),
            ExprKind::Additive { left, right, op } => self.additive_type(expr, left, right, *op),
            ExprKind::Multiplicative { left, right, op } => {
                self.multiplicative_type(expr, left, right, *op)
            }
            ExprKind::Unary { operand, op, .. } => self.unary_type(expr, operand, *op),
            ExprKind::Index { .. } => self.index_type(expr, false, false),
            ExprKind::Call { .. } => self.call_type(expr),
            ExprKind::Identifier(name) => self.identifier_type(expr.span, name, false),
            ExprKind::IntegerLit(_) => PrimType::Integer,
            ExprKind::FloatLit(_) => PrimType::Float,
            ExprKind::StringLit(_) => PrimType::String,
            ExprKind::BooleanLit(_) => PrimType::Boolean,
            ExprKind::ArrayLit(_) => self.array_type(expr).0,
        }
    }

    fn assignable_expr_type(&mut self, expr: &Expr) -> PrimType {
        match &expr.kind {
            ExprKind::Identifier(name) => self.identifier_type(expr.span, name, true),
            _ => self.index_type(expr, true, false),
        }
    }

    fn assignment_type(&mut self, node: &Expr, assignee: &Expr, value: &Expr) -> PrimType {
        let dim_assignee = match &assignee.kind {
            ExprKind::Identifier(name) => {
                match self.retrieve_variable(name, assignee.span) {
                    Some(var) => var.ty.dim,
                    None => return PrimType::Undefined,
                }
            }
            ExprKind::Index { .. } => {
                let (accessed_dim, base) = Self::chain_base(assignee);
                let name = match &base.kind {
                    ExprKind::Identifier(name) => name.clone(),
                    _ => return PrimType::Undefined,
                };
                let var = match self.retrieve_variable(&name, assignee.span) {
                    Some(v) => v,
                    None => return PrimType::Undefined,
                };
                let diff = var.ty.dim as isize - accessed_dim as isize;
                if diff < 0 {
                    self.semantic_error(assignee.span, "Invalid array access".to_string());
                    return PrimType::Undefined;
                }
                diff as usize
            }
            _ => 0,
        };

        let type_assignee = match &assignee.kind {
            ExprKind::Index { .. } => self.index_type(assignee, true, true),
            _ => self.assignable_expr_type(assignee),
        };

        let type_value = self.expr_type(value);
        let dim_value = self.expr_dimension(value);

        let result = typeck::is_valid_assign(type_assignee, type_value, dim_assignee, dim_value);
        if result == PrimType::Undefined {
            self.semantic_error(
                node.span,
                "Assignment Expression must be same datatype and same dimension.".to_string(),
            );
        }
        result
    }

    fn or_and_type(&mut self, node: &Expr, left: &Expr, right: &Expr, is_or: bool) -> PrimType {
        let lt = self.expr_type(left);
        self.is_array_operand(left);
        let rt = self.expr_type(right);
        self.is_array_operand(right);

        let result = typeck::is_valid_or_and(lt, rt);
        if result == PrimType::Undefined {
            let which = if is_or { "or" } else { "and" };
            self.semantic_error(node.span, format!("Both sides must be Boolean in {} expression.", which));
        }
        result
    }

    fn equality_type(&mut self, node: &Expr, left: &Expr, right: &Expr) -> PrimType {
        let lt = self.expr_type(left);
        self.is_array_operand(left);
        let rt = self.expr_type(right);
        self.is_array_operand(right);

        let result = typeck::is_valid_equality(lt, rt);
        if result == PrimType::Undefined {
            self.semantic_error(node.span, "Both sides must be the same type in equality.".to_string());
        }
        result
    }

    fn relational_type(&mut self, node: &Expr, left: &Expr, right: &Expr) -> PrimType {
        let lt = self.expr_type(left);
        let rt = self.expr_type(right);

        let result = typeck::is_valid_relational(lt, rt);
        if result == PrimType::Undefined {
            self.semantic_error(node.span, "Both sides must be numbers in relational.".to_string());
        }
        result
    }

    fn additive_type(&mut self, node: &Expr, left: &Expr, right: &Expr, op: AdditiveOp) -> PrimType {
        let lt = self.expr_type(left);
        self.is_array_operand(left);
        let rt = self.expr_type(right);
        self.is_array_operand(right);

        let result = typeck::is_valid_addition(lt, rt, op);
        if result == PrimType::Undefined {
            self.semantic_error(node.span, "Both sides must be numbers or strings in additive.".to_string());
        }
        result
    }

    fn multiplicative_type(
        &mut self,
        node: &Expr,
        left: &Expr,
        right: &Expr,
        op: MultiplicativeOp,
    ) -> PrimType {
        let lt = self.expr_type(left);
        self.is_array_operand(left);
        let rt = self.expr_type(right);
        self.is_array_operand(right);

        let result = typeck::is_valid_multiplicative(lt, rt, op);
        if result == PrimType::Undefined {
            let message = if op == MultiplicativeOp::Mod {
                "Both sides must be Integers in (%)."
            } else {
                "Both sides must be numbers in multiplicative."
            };
            self.semantic_error(node.span, message.to_string());
        }
        result
    }

    fn unary_type(&mut self, node: &Expr, operand: &Expr, op: UnaryOp) -> PrimType {
        let dim = match &operand.kind {
            ExprKind::Identifier(name) => match self.retrieve_variable(name, operand.span) {
                Some(var) => var.ty.dim,
                None => return PrimType::Undefined,
            },
            ExprKind::Index { .. } => {
                let (accessed, base) = Self::chain_base(operand);
                match &base.kind {
                    ExprKind::Identifier(_) => accessed,
                    _ => {
                        self.semantic_error(
                            operand.span,
                            "Invalid base expression in indexing.".to_string(),
                        );
                        return PrimType::Undefined;
                    }
                }
            }
            _ => 0,
        };

        let operand_type = if op == UnaryOp::Length && matches!(operand.kind, ExprKind::Index { .. }) {
            self.index_type(operand, false, true)
        } else {
            self.expr_type(operand)
        };

        if op != UnaryOp::Length {
            self.is_array_operand(operand);
        }

        let result = typeck::is_valid_unary(operand_type, op, dim);
        if result == PrimType::Undefined {
            let message = match op {
                UnaryOp::Neg => Some("Variable must be Integer or Float in Unary (-)."),
                UnaryOp::Not => Some("Variable must be Boolean in Unary (not)."),
                UnaryOp::Increment | UnaryOp::Decrement => {
                    Some("Variable must be Integer or Float in Unary (++ , --).")
                }
                UnaryOp::Round => Some("Variable must be Integer or Float or boolean in Unary (@)."),
                UnaryOp::Length => Some("Variable must be String or array in Unary (#)."),
                UnaryOp::Stringify | UnaryOp::Booleanize => None,
            };
            if let Some(message) = message {
                self.semantic_error(node.span, message.to_string());
            }
        }
        result
    }

    /// Dimension the way `semantic_array`/`is_initialized_var`/`semantic_index_expr`
    /// compute it across all four call sites that need an expression's
    /// array dimension: an initializer, a return value, an assignment's
    /// right-hand side, a call argument.
    fn expr_dimension(&mut self, expr: &Expr) -> usize {
        match &expr.kind {
            ExprKind::ArrayLit(_) => self.array_type(expr).1,
            ExprKind::Identifier(name) => self
                .is_initialized_var(name, expr.span)
                .map(|v| v.ty.dim)
                .unwrap_or(0),
            ExprKind::Index { .. } => {
                self.index_type(expr, false, true);
                let (depth, base) = Self::chain_base(expr);
                match &base.kind {
                    ExprKind::Identifier(name) => self
                        .is_initialized_var(name, expr.span)
                        .map(|v| v.ty.dim.saturating_sub(depth))
                        .unwrap_or(0),
                    _ => 0,
                }
            }
            _ => 0,
        }
    }

    /// Walks an `Index` chain from outermost to innermost, returning how
    /// many levels were indexed and the non-`Index` base expression at the
    /// bottom of the chain.
    fn chain_base(expr: &Expr) -> (usize, &Expr) {
        let mut depth = 1usize;
        let mut cur = expr;
        loop {
            match &cur.kind {
                ExprKind::Index { base, .. } => {
                    if matches!(base.kind, ExprKind::Index { .. }) {
                        depth += 1;
                        cur = base;
                    } else {
                        return (depth, base);
                    }
                }
                _ => return (depth, cur),
            }
        }
    }

    fn index_type(&mut self, expr: &Expr, set_init: bool, allow_partial: bool) -> PrimType {
        let mut cur = expr;
        loop {
            let (base, index) = match &cur.kind {
                ExprKind::Index { base, index } => (base.as_ref(), index.as_ref()),
                _ => unreachable!("index_type called on a non-Index expression"),
            };
            let idx_ty = self.expr_type(index);
            if idx_ty != PrimType::Integer {
                self.semantic_error(index.span, "Index must be Integer.".to_string());
            }
            match &base.kind {
                ExprKind::Index { .. } => cur = base,
                _ => break,
            }
        }

        let (depth, base) = Self::chain_base(expr);

        let (name, symbol_ty) = match &base.kind {
            ExprKind::Identifier(name) => {
                if set_init {
                    self.scopes.set_initialized(name);
                }
                let ty = match self.scopes.lookup(name).map(Symbol::type_of) {
                    Some(ty) => ty,
                    None => {
                        self.semantic_error(base.span, format!("Variable '{}' must be Declared.", name));
                        return PrimType::Undefined;
                    }
                };
                (name.clone(), ty)
            }
            ExprKind::Call { function, .. } => {
                if !self.scopes.is_exist(function) {
                    self.semantic_error(base.span, format!("Function '{}' must be Declared.", function));
                    return PrimType::Undefined;
                }
                let ty = match self.scopes.lookup(function).map(Symbol::type_of) {
                    Some(ty) => ty,
                    None => return PrimType::Undefined,
                };
                (function.clone(), ty)
            }
            _ => {
                self.semantic_error(base.span, "Invalid base expression in indexing.".to_string());
                return PrimType::Undefined;
            }
        };

        let computed_type = self.expr_type(base);

        if (depth != symbol_ty.dim && !allow_partial) || depth > symbol_ty.dim {
            self.semantic_error(
                expr.span,
                format!(
                    "Dimension mismatch for variable {}: expected {}, but got {}",
                    name, symbol_ty.dim, depth
                ),
            );
        }
        if computed_type != symbol_ty.base {
            self.semantic_error(
                expr.span,
                format!(
                    "Datatype mismatch for variable {}: expected {}, but got {}",
                    name, computed_type, symbol_ty.base
                ),
            );
        }

        computed_type
    }

    fn call_type(&mut self, expr: &Expr) -> PrimType {
        let (function, arguments) = match &expr.kind {
            ExprKind::Call { function, arguments } => (function, arguments),
            _ => unreachable!("call_type called on a non-Call expression"),
        };

        if !self.scopes.is_exist(function) {
            self.semantic_error(expr.span, format!("Function '{}' Not Declared.", function));
            return PrimType::Undefined;
        }
        let func = match self.scopes.lookup_function(function).and_then(Symbol::as_function).cloned() {
            Some(f) => f,
            None => {
                self.semantic_error(expr.span, format!("Function '{}' Not Declared.", function));
                return PrimType::Undefined;
            }
        };

        let got = arguments.len();
        if got < func.required || got > func.parameters.len() {
            self.semantic_error(
                expr.span,
                format!(
                    "Function '{}' expects between {} and {} arguments, but got {}.",
                    function,
                    func.required,
                    func.parameters.len(),
                    got
                ),
            );
            return func.return_type.base;
        }

        for (i, (arg, expected)) in arguments.iter().zip(func.parameters.iter()).enumerate() {
            let arg_type = match &arg.kind {
                ExprKind::Index { .. } => self.index_type(arg, false, true),
                _ => self.expr_type(arg),
            };
            if arg_type != expected.base {
                self.semantic_error(
                    arg.span,
                    format!(
                        "Argument {} in function '{}' should be of type {}, but got {}.",
                        i + 1,
                        function,
                        expected.base,
                        arg_type
                    ),
                );
            }
            let arg_dim = self.expr_dimension(arg);
            if arg_dim != expected.dim {
                self.semantic_error(
                    arg.span,
                    format!(
                        "Dimension mismatch in argument {} in function '{}': expected dim {}, but got {}.",
                        i + 1,
                        function,
                        expected.dim,
                        arg_dim
                    ),
                );
            }
        }

        func.return_type.base
    }

    fn identifier_type(&mut self, span: Span, name: &str, set_init: bool) -> PrimType {
        if !self.scopes.is_exist(name) {
            self.semantic_error(span, format!("Variable '{}' Not Declared.", name));
            return PrimType::Undefined;
        }
        if set_init {
            self.scopes.set_initialized(name);
            return self.scopes.lookup(name).map(Symbol::type_of).unwrap_or(TypeName::scalar(PrimType::Undefined)).base;
        }
        match self.is_initialized_var(name, span) {
            Some(var) => var.ty.base,
            None => PrimType::Undefined,
        }
    }

    fn array_type(&mut self, expr: &Expr) -> (PrimType, usize) {
        let elements = match &expr.kind {
            ExprKind::ArrayLit(elements) => elements,
            _ => unreachable!("array_type called on a non-ArrayLit expression"),
        };

        if elements.is_empty() {
            return (PrimType::Undefined, 1);
        }

        if !matches!(elements[0].kind, ExprKind::ArrayLit(_)) {
            return self.array_value_type(elements, expr.span);
        }

        let mut result_dim = 0usize;
        let mut dt = PrimType::Undefined;
        let mut previous_dim: Option<usize> = None;
        for (i, el) in elements.iter().enumerate() {
            let (el_dt, el_dim) = self.array_type(el);
            if el_dt != PrimType::Undefined {
                if dt == PrimType::Undefined {
                    dt = el_dt;
                } else if dt != el_dt {
                    self.semantic_error(
                        expr.span,
                        "array contain value of multiple datatypes".to_string(),
                    );
                }
            }
            if i > 0 {
                if let Some(prev) = previous_dim {
                    if prev != el_dim {
                        self.semantic_error(expr.span, "Inconsistent array dimension.".to_string());
                        return (PrimType::Undefined, 0);
                    }
                }
            }
            previous_dim = Some(el_dim);
            result_dim = el_dim;
        }

        (dt, result_dim + 1)
    }

    fn array_value_type(&mut self, elements: &[Expr], span: Span) -> (PrimType, usize) {
        let mut dt = PrimType::Undefined;
        let mut max_inner_dim = 0usize;

        for el in elements {
            let el_type = self.expr_type(el);
            if el_type != PrimType::Undefined {
                if dt == PrimType::Undefined {
                    dt = el_type;
                } else if dt != el_type {
                    self.semantic_error(span, "array contain value of multiple datatypes".to_string());
                }
            }

            let inner_dim = match &el.kind {
                ExprKind::Identifier(name) => self
                    .scopes
                    .lookup(name)
                    .map(Symbol::type_of)
                    .map(|t| t.dim)
                    .unwrap_or(0),
                ExprKind::ArrayLit(_) => self.array_type(el).1,
                _ => 0,
            };
            if inner_dim > max_inner_dim {
                max_inner_dim = inner_dim;
            }
        }

        (dt, max_inner_dim + 1)
    }

    // ---- shared lookups --------------------------------------------------

    fn retrieve_variable(&mut self, name: &str, span: Span) -> Option<VariableSymbol> {
        if !self.scopes.is_exist(name) {
            self.semantic_error(span, format!("Variable '{}' must be Declared.", name));
            return None;
        }
        match self.scopes.lookup(name).and_then(Symbol::as_variable).cloned() {
            Some(v) => Some(v),
            None => {
                self.semantic_error(span, format!("Variable '{}' must be Declared.", name));
                None
            }
        }
    }

    fn is_initialized_var(&mut self, name: &str, span: Span) -> Option<VariableSymbol> {
        let var = self.retrieve_variable(name, span)?;
        if !var.initialized {
            self.semantic_error(span, format!("Variable '{}' must be Initialized.", name));
            return None;
        }
        Some(var)
    }

    fn is_array_operand(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Identifier(name) => {
                let var = match self.retrieve_variable(name, expr.span) {
                    Some(v) => v,
                    None => return,
                };
                if var.ty.dim > 0 {
                    self.semantic_error(expr.span, "Invalid Expression can't use array.".to_string());
                }
            }
            ExprKind::Call { function, .. } => {
                if !self.scopes.is_exist(function) {
                    self.semantic_error(expr.span, format!("Function '{}' must be Declared.", function));
                    return;
                }
                match self.scopes.lookup(function).and_then(Symbol::as_function) {
                    Some(f) => {
                        if f.return_type.dim > 0 {
                            self.semantic_error(expr.span, "Invalid Expression can't use array.".to_string());
                        }
                    }
                    None => {
                        self.semantic_error(expr.span, format!("Function '{}' must be Declared.", function));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Entry point: runs the semantic walk over `source`, returning the first
/// latched fault (if any).
pub fn analyze(source: &Source) -> Result<(), Diagnostic> {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_source(source);
    match analyzer.error {
        Some(diagnostic) => Err(diagnostic),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{HandCoded, Scanner};
    use crate::parser::{Parser, RecursiveDescent};

    fn check(src: &str) -> Result<(), Diagnostic> {
        let tokens = HandCoded::new(src).tokenize_all();
        let source = RecursiveDescent::parse(tokens).expect("program should parse");
        analyze(&source)
    }

    #[test]
    fn accepts_minimal_program() {
        assert!(check("program demo is begin end").is_ok());
    }

    #[test]
    fn accepts_declared_and_used_variable() {
        assert!(check("program demo is begin var x : integer = 1; write x; end").is_ok());
    }

    #[test]
    fn rejects_duplicate_global_name() {
        let err = check("program demo is var x, x : integer; begin end").unwrap_err();
        assert!(err.message.contains("already exists"), "{}", err.message);
    }

    #[test]
    fn rejects_uninitialized_use() {
        let err = check("program demo is begin var x : integer; write x; end").unwrap_err();
        assert!(err.message.contains("must be Initialized"), "{}", err.message);
    }

    #[test]
    fn rejects_unknown_variable() {
        let err = check("program demo is begin write x; end").unwrap_err();
        assert!(err.message.contains("Not Declared"), "{}", err.message);
    }

    #[test]
    fn rejects_dimension_mismatch_on_assign() {
        let err = check(
            "program demo is begin var a : [integer]; var b : integer; a[0] = 1; b = a; end",
        )
        .unwrap_err();
        assert!(err.message.contains("datatype and same dimension"), "{}", err.message);
    }

    #[test]
    fn rejects_array_used_as_scalar_operand() {
        let err = check(
            "program demo is begin var a : [integer] = {1, 2}; write a + 1; end",
        )
        .unwrap_err();
        assert!(err.message.contains("can't use array"), "{}", err.message);
    }

    #[test]
    fn rejects_missing_return_in_non_void_function() {
        let err = check(
            "func integer f has var x : integer; begin write x; end func program demo is begin end",
        )
        .unwrap_err();
        assert!(err.message.contains("missing a return statement"), "{}", err.message);
    }

    #[test]
    fn accepts_returning_function() {
        assert!(check(
            "func integer f has var x : integer; begin return x; end func program demo is begin end"
        )
        .is_ok());
    }

    #[test]
    fn rejects_call_arity_mismatch() {
        let err = check(
            "func integer add has var x : integer; var y : integer; begin return x + y; end func \
             program demo is begin write add(1); end",
        )
        .unwrap_err();
        assert!(err.message.contains("expects between"), "{}", err.message);
    }

    #[test]
    fn rejects_call_argument_type_mismatch() {
        let err = check(
            "func integer add has var x : integer; var y : integer; begin return x + y; end func \
             program demo is begin write add(true, 2); end",
        )
        .unwrap_err();
        assert!(err.message.contains("should be of type"), "{}", err.message);
    }

    #[test]
    fn rejects_for_loop_variable_shadowing_outer_scope() {
        let err = check(
            "program demo is var i : integer; begin for i = 0; i < 10; i++ do write i; end for end",
        )
        .unwrap_err();
        assert!(err.message.contains("Declared"), "{}", err.message);
    }

    #[test]
    fn accepts_for_loop_fresh_variable() {
        assert!(check(
            "program demo is begin for i = 0; i < 10; i++ do write i; end for end"
        )
        .is_ok());
    }

    #[test]
    fn accepts_length_of_whole_array_and_of_an_indexed_element() {
        assert!(check(
            "program demo is var a : [[integer]] = {{1,2},{3}}; begin write #a; write #a[0]; end"
        )
        .is_ok());
    }

    #[test]
    fn accepts_length_of_string() {
        assert!(check(
            "program demo is begin var s : string = \"hi\"; write #s; end"
        )
        .is_ok());
    }

    #[test]
    fn rejects_void_return_with_value() {
        let err = check(
            "func void f has var x : integer; begin return x; end func program demo is begin end",
        )
        .unwrap_err();
        assert!(err.message.contains("must not have an expression"), "{}", err.message);
    }
}
