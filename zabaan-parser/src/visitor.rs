//! Visitor pattern for AST nodes.

use crate::ast::{Expr, ExprKind, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::NumberLit(_) => {}
        ExprKind::StringLit(_) => {}
        ExprKind::BoolLit(_) => {}
        ExprKind::Identifier(_) => {}
        ExprKind::Binary { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        ExprKind::Unary { op: _, arg } => visitor.visit_expr(arg),
        ExprKind::Assignment { ident: _, value } => visitor.visit_expr(value),
        ExprKind::FnCall { ident: _, args } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::ArrayLit(elements) => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        ExprKind::ObjectLit(members) => {
            for (_name, value) in members {
                visitor.visit_expr(value);
            }
        }
        ExprKind::ArrayAccess { ident: _, index } => visitor.visit_expr(index),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDeclaration {
            ident: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::FnDeclaration {
            ident: _,
            params: _,
            body,
        } => visit_stmt_list!(visitor, body),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visit_stmt_list!(visitor, then_branch);
            visit_stmt_list!(visitor, else_branch);
        }
        Stmt::Loop { condition, body } => {
            visitor.visit_expr(condition);
            visit_stmt_list!(visitor, body);
        }
        Stmt::ReturnStmt(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for stmt in &program.statements {
        visitor.visit_stmt(stmt);
    }
}
