use std::error;
use std::fmt;
use std::mem;

use crate::ast::{Expr, ExprKind, Program, Stmt};
use crate::lexer::{Token, TokenKind};

mod expr;
mod stmt;

/// Bound on statement and expression nesting. Exceeding it is an ordinary
/// parse error rather than a blown stack.
const MAX_NESTING_DEPTH: usize = 200;

/// A fatal syntax error. One of these aborts the whole parse; no partial
/// tree is ever returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}", self.message, self.line)
    }
}

impl error::Error for ParseError {}

/// Recursive-descent parser over a token sequence, with one token of
/// lookahead and explicit binding powers for expressions.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // lookahead relies on a trailing end-of-input token
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column)).unwrap_or((1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line,
                column,
            });
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }
}

/// Parse utilities
impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    /// Predicate that tests whether the next token has the same discriminant.
    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && mem::discriminant(&self.peek().kind) == mem::discriminant(kind)
    }

    /// Like [`Self::check`], but eats the next token on a match as a side effect.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: &TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(message, self.peek().line))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Identifier(ident) => {
                let ident = ident.clone();
                self.advance();
                Ok(ident)
            }
            _ => Err(ParseError::new(message, self.peek().line)),
        }
    }

    fn enter_nested(&mut self, what: &str) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.depth -= 1;
            return Err(ParseError::new(
                format!("{} nesting too deep", what),
                self.peek().line,
            ));
        }
        Ok(())
    }
}
