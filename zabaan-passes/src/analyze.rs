//! Semantic analysis pass: name resolution and type checking.

use zabaan_parser::ast::{Expr, ExprKind, Program, Stmt};
use zabaan_parser::lexer::TokenKind;
use zabaan_parser::visitor::{walk_expr, Visitor};
use zabaan_source::Source;
use zabaan_types::Type;

use crate::symbol::SymbolTable;

/// Bound on tree depth during traversal. The parser bounds its own recursion
/// well below this, so only hand-built trees can reach it.
const MAX_TRAVERSAL_DEPTH: usize = 512;

/// Single-pass analyzer: walks the tree top-down, synthesizes expression
/// types bottom-up, stamps each expression node, and accumulates diagnostics
/// into the [`Source`] instead of stopping at the first problem.
pub struct SemanticAnalyzer<'a> {
    symbols: SymbolTable,
    /// Informational only; never checked against a declared return type.
    current_return_type: Type,
    in_function: bool,
    depth: usize,
    /// Set once when traversal hits a structural limit; ends the analysis.
    fatal: Option<String>,
    source: &'a Source<'a>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(source: &'a Source) -> Self {
        Self {
            symbols: SymbolTable::new(),
            current_return_type: Type::Void,
            in_function: false,
            depth: 0,
            fatal: None,
            source,
        }
    }

    /// Analyzes the whole program. Returns `true` when no diagnostics were
    /// recorded. A program without a global `kaam main()` always fails.
    pub fn analyze(&mut self, program: &'a Program) -> bool {
        self.visit_program(program);

        if let Some(message) = self.fatal.take() {
            self.source.errors.add_exception(message);
            return false;
        }

        match self.symbols.lookup("main") {
            Some(symbol) if symbol.is_function => {}
            _ => {
                self.source
                    .errors
                    .add_error("Main function 'kaam main()' not found");
                return false;
            }
        }

        self.source.has_no_errors()
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    fn error(&mut self, message: impl ToString) {
        self.source.errors.add_error(message);
    }

    /// Visits `expr` and reads back the stamped type.
    fn expr_type(&mut self, expr: &'a Expr) -> Type {
        self.visit_expr(expr);
        expr.ty.get()
    }

    fn infer_expr(&mut self, expr: &'a Expr) -> Type {
        match &expr.kind {
            ExprKind::NumberLit(_) => Type::Number,
            ExprKind::StringLit(_) => Type::String,
            ExprKind::BoolLit(_) => Type::Boolean,
            ExprKind::Identifier(ident) => match self.symbols.lookup(ident) {
                Some(symbol) => symbol.ty,
                None => {
                    self.error(format!("Undefined variable '{}'", ident));
                    Type::Unknown
                }
            },
            ExprKind::Binary { lhs, op, rhs } => self.check_binary(lhs, op, rhs),
            ExprKind::Unary { op, arg } => self.check_unary(op, arg),
            ExprKind::Assignment { ident, value } => self.check_assignment(ident, value),
            ExprKind::FnCall { ident, args } => self.check_call(ident, args),
            ExprKind::ArrayLit(_) => {
                // element types are not tracked, but nested errors still count
                walk_expr(self, expr);
                Type::Array
            }
            ExprKind::ObjectLit(_) => {
                walk_expr(self, expr);
                Type::Object
            }
            ExprKind::ArrayAccess { ident, index } => self.check_array_access(ident, index),
        }
    }

    fn check_binary(&mut self, lhs: &'a Expr, op: &TokenKind, rhs: &'a Expr) -> Type {
        let left = self.expr_type(lhs);
        let right = self.expr_type(rhs);

        match op {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent => {
                // unknown and void pass so recursive and forward calls stay clean
                if !matches!(left, Type::Number | Type::Unknown | Type::Void) {
                    self.error(format!("Left operand of '{}' must be number", op.op_str()));
                }
                if !matches!(right, Type::Number | Type::Unknown | Type::Void) {
                    self.error(format!("Right operand of '{}' must be number", op.op_str()));
                }
                Type::Number
            }
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
                if !matches!(left, Type::Number | Type::Unknown) {
                    self.error(format!("Left operand of '{}' must be number", op.op_str()));
                }
                if !matches!(right, Type::Number | Type::Unknown) {
                    self.error(format!("Right operand of '{}' must be number", op.op_str()));
                }
                Type::Boolean
            }
            // equality compares anything
            TokenKind::Eq | TokenKind::Ne => Type::Boolean,
            TokenKind::And | TokenKind::Or => {
                if !matches!(left, Type::Boolean | Type::Unknown) {
                    self.error(format!("Left operand of '{}' must be boolean", op.op_str()));
                }
                if !matches!(right, Type::Boolean | Type::Unknown) {
                    self.error(format!("Right operand of '{}' must be boolean", op.op_str()));
                }
                Type::Boolean
            }
            _ => Type::Unknown,
        }
    }

    fn check_unary(&mut self, op: &TokenKind, arg: &'a Expr) -> Type {
        let operand = self.expr_type(arg);
        match op {
            TokenKind::Minus => {
                if !matches!(operand, Type::Number | Type::Unknown) {
                    self.error("Operand of '-' must be number");
                }
                Type::Number
            }
            TokenKind::Not => {
                if !matches!(operand, Type::Boolean | Type::Unknown) {
                    self.error("Operand of '!' must be boolean");
                }
                Type::Boolean
            }
            _ => Type::Unknown,
        }
    }

    fn check_assignment(&mut self, ident: &str, value: &'a Expr) -> Type {
        let symbol = match self.symbols.lookup(ident) {
            Some(symbol) => symbol,
            None => {
                self.error(format!("Undefined variable '{}'", ident));
                return Type::Unknown;
            }
        };

        let value_type = self.expr_type(value);

        if symbol.ty != Type::Unknown && value_type != Type::Unknown && symbol.ty != value_type {
            self.error(format!(
                "Type mismatch in assignment to '{}': expected {}, got {}",
                ident, symbol.ty, value_type
            ));
        }

        self.symbols.update(ident);
        value_type
    }

    fn check_array_access(&mut self, ident: &str, index: &'a Expr) -> Type {
        match self.symbols.lookup(ident) {
            Some(symbol) => {
                if symbol.ty != Type::Array && symbol.ty != Type::Unknown {
                    self.error(format!("Cannot index non-array type '{}'", ident));
                }
                let index_type = self.expr_type(index);
                if !matches!(index_type, Type::Number | Type::Unknown) {
                    self.error(format!("Array index must be number, got {}", index_type));
                }
                // element types are not tracked
                Type::Unknown
            }
            None => {
                self.error(format!("Undefined array '{}'", ident));
                Type::Unknown
            }
        }
    }

    /// Builtins carry hard-coded arity and type rules; user-defined calls
    /// check argument count only and yield the declared return type.
    fn check_call(&mut self, ident: &str, args: &'a [Expr]) -> Type {
        let symbol = match self.symbols.lookup(ident) {
            Some(symbol) => symbol,
            None => {
                self.error(format!("Undefined function '{}'", ident));
                return Type::Unknown;
            }
        };
        if !symbol.is_function {
            self.error(format!("'{}' is not a function", ident));
            return Type::Unknown;
        }

        match ident {
            "dekh" => {
                for arg in args {
                    self.visit_expr(arg);
                }
                Type::Void
            }
            "lou" => {
                if let Some(arg) = args.first() {
                    self.visit_expr(arg);
                }
                Type::Number
            }
            "nikal" => {
                if args.len() != 1 {
                    self.error(format!("nikal() expects 1 argument, got {}", args.len()));
                } else {
                    self.visit_expr(&args[0]);
                }
                Type::Number
            }
            "band" => Type::Void,
            "abs" | "sqrt" | "round" => {
                if args.len() != 1 {
                    self.error(format!("{}() expects 1 argument", ident));
                } else {
                    let arg_type = self.expr_type(&args[0]);
                    if !matches!(arg_type, Type::Number | Type::Unknown) {
                        self.error(format!("{}() expects number argument", ident));
                    }
                }
                Type::Number
            }
            "pow" | "max" | "min" => {
                if args.len() != 2 {
                    self.error(format!("{}() expects 2 arguments", ident));
                } else {
                    for arg in args {
                        let arg_type = self.expr_type(arg);
                        if !matches!(arg_type, Type::Number | Type::Unknown) {
                            self.error(format!("{}() expects number arguments", ident));
                        }
                    }
                }
                Type::Number
            }
            "random" => Type::Number,
            _ => {
                if args.len() != symbol.param_types.len() {
                    self.error(format!(
                        "Function '{}' expects {} arguments, got {}",
                        ident,
                        symbol.param_types.len(),
                        args.len()
                    ));
                }
                for arg in args {
                    self.visit_expr(arg);
                }
                symbol.return_type
            }
        }
    }

    fn analyze_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::VarDeclaration { ident, initializer } => {
                let ty = match initializer {
                    Some(init) => self.expr_type(init),
                    None => Type::Unknown,
                };
                if !self.symbols.define(ident, ty, false, true) {
                    self.error(format!(
                        "Variable '{}' already defined in current scope",
                        ident
                    ));
                }
            }
            Stmt::FnDeclaration {
                ident,
                params,
                body,
            } => {
                // parameter types are never inferred from call sites or usage
                self.symbols.add_function_signature(
                    ident,
                    vec![Type::Unknown; params.len()],
                    Type::Void,
                );

                self.symbols.enter_scope();
                let prev_in_function = self.in_function;
                let prev_return_type = self.current_return_type;
                self.in_function = true;
                self.current_return_type = Type::Unknown;

                for param in params {
                    self.symbols.define(param, Type::Unknown, false, true);
                }
                for stmt in body {
                    self.visit_stmt(stmt);
                }

                self.in_function = prev_in_function;
                self.current_return_type = prev_return_type;
                self.symbols.exit_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond_type = self.expr_type(condition);
                if !matches!(cond_type, Type::Boolean | Type::Unknown | Type::Void) {
                    self.error(format!("If condition must be boolean, got {}", cond_type));
                }

                self.symbols.enter_scope();
                for stmt in then_branch {
                    self.visit_stmt(stmt);
                }
                self.symbols.exit_scope();

                if !else_branch.is_empty() {
                    self.symbols.enter_scope();
                    for stmt in else_branch {
                        self.visit_stmt(stmt);
                    }
                    self.symbols.exit_scope();
                }
            }
            Stmt::Loop { condition, body } => {
                let cond_type = self.expr_type(condition);
                if !matches!(cond_type, Type::Boolean | Type::Unknown | Type::Void) {
                    self.error(format!("Loop condition must be boolean, got {}", cond_type));
                }

                self.symbols.enter_scope();
                for stmt in body {
                    self.visit_stmt(stmt);
                }
                self.symbols.exit_scope();
            }
            Stmt::ReturnStmt(value) => {
                if !self.in_function {
                    self.error("Return statement outside function");
                    return;
                }
                if let Some(value) = value {
                    self.current_return_type = self.expr_type(value);
                }
            }
            Stmt::ExprStmt(expr) => self.visit_expr(expr),
            Stmt::Block(body) => {
                self.symbols.enter_scope();
                for stmt in body {
                    self.visit_stmt(stmt);
                }
                self.symbols.exit_scope();
            }
        }
    }
}

impl<'a> Visitor<'a> for SemanticAnalyzer<'a> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if self.fatal.is_some() {
            return;
        }
        if self.depth >= MAX_TRAVERSAL_DEPTH {
            self.fatal = Some("Syntax tree nesting too deep".to_string());
            return;
        }
        self.depth += 1;
        let ty = self.infer_expr(expr);
        expr.ty.set(ty);
        self.depth -= 1;
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        // Do not use default walking logic.
        if self.fatal.is_some() {
            return;
        }
        if self.depth >= MAX_TRAVERSAL_DEPTH {
            self.fatal = Some("Syntax tree nesting too deep".to_string());
            return;
        }
        self.depth += 1;
        self.analyze_stmt(stmt);
        self.depth -= 1;
    }
}
