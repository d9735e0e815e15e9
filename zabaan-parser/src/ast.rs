use std::cell::Cell;
use std::fmt;

use crate::lexer::TokenKind;
use zabaan_types::Type;

/// A whole source file: the top-level statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDeclaration {
        ident: String,
        initializer: Option<Expr>,
    },
    FnDeclaration {
        ident: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    /// Condition-only loop (`daura`), closest to a while-loop.
    Loop {
        condition: Expr,
        body: Vec<Stmt>,
    },
    ReturnStmt(Option<Expr>),
    ExprStmt(Expr),
    /// A standalone brace-delimited statement list. Introduces a scope.
    Block(Vec<Stmt>),
}

/// An expression node. The tree is immutable after parsing except for `ty`,
/// which starts as [`Type::Unknown`] and is stamped once by semantic analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Cell<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            ty: Cell::new(Type::Unknown),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLit(f64),
    StringLit(String),
    BoolLit(bool),
    /// An identifier (e.g. `foo`).
    Identifier(String),
    /// A binary expression (e.g. `1 + 1`). Compound assignments desugar to
    /// a plain assignment over one of these.
    Binary {
        lhs: Box<Expr>,
        op: TokenKind,
        rhs: Box<Expr>,
    },
    Unary {
        op: TokenKind,
        arg: Box<Expr>,
    },
    /// `ident = value`. The target is restricted to a plain name.
    Assignment {
        ident: String,
        value: Box<Expr>,
    },
    FnCall {
        ident: String,
        args: Vec<Expr>,
    },
    ArrayLit(Vec<Expr>),
    /// Ordered `name: value` members; duplicate names are representable.
    ObjectLit(Vec<(String, Expr)>),
    /// `ident[index]`. The target is restricted to a plain name.
    ArrayAccess {
        ident: String,
        index: Box<Expr>,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            stmt.fmt_indented(f, 0)?;
        }
        Ok(())
    }
}

impl Stmt {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        match self {
            Stmt::VarDeclaration { ident, initializer } => match initializer {
                Some(init) => writeln!(f, "{}banao {} = {};", pad, ident, init),
                None => writeln!(f, "{}banao {};", pad, ident),
            },
            Stmt::FnDeclaration {
                ident,
                params,
                body,
            } => {
                writeln!(f, "{}kaam {}({}) {{", pad, ident, params.join(", "))?;
                for stmt in body {
                    stmt.fmt_indented(f, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                writeln!(f, "{}agar ({}) {{", pad, condition)?;
                for stmt in then_branch {
                    stmt.fmt_indented(f, indent + 1)?;
                }
                if else_branch.is_empty() {
                    writeln!(f, "{}}}", pad)
                } else {
                    writeln!(f, "{}}} warnah {{", pad)?;
                    for stmt in else_branch {
                        stmt.fmt_indented(f, indent + 1)?;
                    }
                    writeln!(f, "{}}}", pad)
                }
            }
            Stmt::Loop { condition, body } => {
                writeln!(f, "{}daura ({}) {{", pad, condition)?;
                for stmt in body {
                    stmt.fmt_indented(f, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
            Stmt::ReturnStmt(value) => match value {
                Some(value) => writeln!(f, "{}wapas {};", pad, value),
                None => writeln!(f, "{}wapas;", pad),
            },
            Stmt::ExprStmt(expr) => writeln!(f, "{}{};", pad, expr),
            Stmt::Block(body) => {
                writeln!(f, "{}{{", pad)?;
                for stmt in body {
                    stmt.fmt_indented(f, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Parenthesizes a binary operand only where re-parsing would otherwise
/// change the tree shape.
fn fmt_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expr,
    parent_bp: u8,
    is_right: bool,
) -> fmt::Result {
    let parens = match &operand.kind {
        ExprKind::Binary { op, .. } => {
            let (l_bp, _) = op.binop_bp().unwrap_or((u8::MAX, u8::MAX));
            l_bp < parent_bp || (is_right && l_bp == parent_bp)
        }
        ExprKind::Assignment { .. } => true,
        _ => false,
    };
    if parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::NumberLit(value) => write!(f, "{}", value),
            ExprKind::StringLit(value) => {
                // no escapes exist; pick whichever quote the content lacks
                if value.contains('"') {
                    write!(f, "'{}'", value)
                } else {
                    write!(f, "\"{}\"", value)
                }
            }
            ExprKind::BoolLit(true) => write!(f, "haan"),
            ExprKind::BoolLit(false) => write!(f, "na"),
            ExprKind::Identifier(ident) => write!(f, "{}", ident),
            ExprKind::Binary { lhs, op, rhs } => {
                let (l_bp, _) = op.binop_bp().unwrap_or((0, 0));
                fmt_operand(f, lhs, l_bp, false)?;
                write!(f, " {} ", op.op_str())?;
                fmt_operand(f, rhs, l_bp, true)
            }
            ExprKind::Unary { op, arg } => {
                write!(f, "{}", op.op_str())?;
                if matches!(
                    arg.kind,
                    ExprKind::Binary { .. } | ExprKind::Assignment { .. }
                ) {
                    write!(f, "({})", arg)
                } else {
                    write!(f, "{}", arg)
                }
            }
            ExprKind::Assignment { ident, value } => write!(f, "{} = {}", ident, value),
            ExprKind::FnCall { ident, args } => {
                write!(f, "{}(", ident)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::ArrayLit(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            ExprKind::ObjectLit(members) => {
                if members.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (name, value)) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, " }}")
            }
            ExprKind::ArrayAccess { ident, index } => write!(f, "{}[{}]", ident, index),
        }
    }
}
