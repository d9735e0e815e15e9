use super::*;

/// Base operator for a compound assignment token, or `None`.
fn compound_base(kind: &TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::PlusAssign => Some(TokenKind::Plus),
        TokenKind::MinusAssign => Some(TokenKind::Minus),
        TokenKind::StarAssign => Some(TokenKind::Star),
        TokenKind::SlashAssign => Some(TokenKind::Slash),
        _ => None,
    }
}

impl Parser {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.enter_nested("Expression")?;
        let result = self.parse_expr_bp_inner(min_bp);
        self.depth -= 1;
        result
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let (l_bp, r_bp) = match self.peek().kind.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            let op_token = self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = if op_token.kind == TokenKind::Assign {
                match lhs.kind {
                    ExprKind::Identifier(ident) => Expr::new(ExprKind::Assignment {
                        ident,
                        value: Box::new(rhs),
                    }),
                    _ => return Err(ParseError::new("Invalid assignment target", op_token.line)),
                }
            } else if let Some(base_op) = compound_base(&op_token.kind) {
                // `x op= v` is sugar for `x = x op v`
                match lhs.kind {
                    ExprKind::Identifier(ident) => {
                        let target = Expr::new(ExprKind::Identifier(ident.clone()));
                        let value = Expr::new(ExprKind::Binary {
                            lhs: Box::new(target),
                            op: base_op,
                            rhs: Box::new(rhs),
                        });
                        Expr::new(ExprKind::Assignment {
                            ident,
                            value: Box::new(value),
                        })
                    }
                    _ => return Err(ParseError::new("Invalid assignment target", op_token.line)),
                }
            } else {
                Expr::new(ExprKind::Binary {
                    lhs: Box::new(lhs),
                    op: op_token.kind,
                    rhs: Box::new(rhs),
                })
            };
        }

        Ok(lhs)
    }

    /// Parses a prefix `-`/`!` chain, then hands off to postfix parsing.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek().kind, TokenKind::Not | TokenKind::Minus) {
            self.enter_nested("Expression")?;
            let op = self.advance().kind;
            let arg = self.parse_unary();
            self.depth -= 1;
            return Ok(Expr::new(ExprKind::Unary {
                op,
                arg: Box::new(arg?),
            }));
        }
        self.parse_postfix()
    }

    /// Parses indexing and call suffixes. Both only apply to plain names;
    /// chaining off a previous call or index is rejected here.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.eat(&TokenKind::LBracket) {
                let line = self.previous().line;
                let index = self.parse_expression()?;
                self.consume(&TokenKind::RBracket, "Expected ']' after array index")?;
                expr = match expr.kind {
                    ExprKind::Identifier(ident) => Expr::new(ExprKind::ArrayAccess {
                        ident,
                        index: Box::new(index),
                    }),
                    _ => return Err(ParseError::new("Invalid array access target", line)),
                };
            } else if self.check(&TokenKind::LParen) {
                let line = self.peek().line;
                self.advance();
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&TokenKind::RParen, "Expected ')' after function arguments")?;
                expr = match expr.kind {
                    ExprKind::Identifier(ident) => Expr::new(ExprKind::FnCall { ident, args }),
                    _ => return Err(ParseError::new("Invalid call target", line)),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Haan => {
                self.advance();
                ExprKind::BoolLit(true)
            }
            TokenKind::Na => {
                self.advance();
                ExprKind::BoolLit(false)
            }
            TokenKind::Number(value) => {
                self.advance();
                ExprKind::NumberLit(value)
            }
            TokenKind::Str(value) => {
                self.advance();
                ExprKind::StringLit(value)
            }
            TokenKind::Identifier(ident) => {
                self.advance();
                ExprKind::Identifier(ident)
            }
            // builtin-call keywords act as callable identifiers
            TokenKind::Dekh => {
                self.advance();
                ExprKind::Identifier("dekh".to_string())
            }
            TokenKind::Lou => {
                self.advance();
                ExprKind::Identifier("lou".to_string())
            }
            TokenKind::Band => {
                self.advance();
                ExprKind::Identifier("band".to_string())
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&TokenKind::RBracket, "Expected ']' after array elements")?;
                ExprKind::ArrayLit(elements)
            }
            TokenKind::LBrace => {
                self.advance();
                let mut members = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    loop {
                        let name = self.consume_identifier("Expected property name")?;
                        self.consume(&TokenKind::Colon, "Expected ':' after property name")?;
                        let value = self.parse_expression()?;
                        members.push((name, value));
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&TokenKind::RBrace, "Expected '}' after object properties")?;
                ExprKind::ObjectLit(members)
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(&TokenKind::RParen, "Expected ')' after expression")?;
                // grouping is structural only and produces no node
                return Ok(expr);
            }
            _ => {
                return Err(ParseError::new(
                    format!("Expected expression at token: {}", token.lexeme),
                    token.line,
                ))
            }
        };
        Ok(Expr::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use zabaan_source::Source;

    fn expr(text: &str) -> Expr {
        let source = Source::new(text);
        let mut parser = Parser::new(tokenize(&source));
        parser.parse_expression().expect("expression should parse")
    }

    fn expr_err(text: &str) -> ParseError {
        let source = Source::new(text);
        let mut parser = Parser::new(tokenize(&source));
        parser.parse_expression().expect_err("expression should fail")
    }

    fn num(value: f64) -> Expr {
        Expr::new(ExprKind::NumberLit(value))
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()))
    }

    fn binary(lhs: Expr, op: TokenKind, rhs: Expr) -> Expr {
        Expr::new(ExprKind::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    fn assign(name: &str, value: Expr) -> Expr {
        Expr::new(ExprKind::Assignment {
            ident: name.to_string(),
            value: Box::new(value),
        })
    }

    #[test]
    fn literals() {
        assert_eq!(expr("1"), num(1.0));
        assert_eq!(expr("2.5"), num(2.5));
        assert_eq!(expr("haan"), Expr::new(ExprKind::BoolLit(true)));
        assert_eq!(expr("na"), Expr::new(ExprKind::BoolLit(false)));
        assert_eq!(
            expr("\"salam\""),
            Expr::new(ExprKind::StringLit("salam".to_string()))
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expr("1 + 2 * 3"),
            binary(num(1.0), TokenKind::Plus, binary(num(2.0), TokenKind::Star, num(3.0)))
        );
        assert_eq!(
            expr("1 * 2 + 3"),
            binary(binary(num(1.0), TokenKind::Star, num(2.0)), TokenKind::Plus, num(3.0))
        );
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(
            expr("7 - 2 - 1"),
            binary(binary(num(7.0), TokenKind::Minus, num(2.0)), TokenKind::Minus, num(1.0))
        );
    }

    #[test]
    fn logical_operators_bind_loosest() {
        assert_eq!(
            expr("a && b || c"),
            binary(
                binary(ident("a"), TokenKind::And, ident("b")),
                TokenKind::Or,
                ident("c")
            )
        );
        assert_eq!(
            expr("1 < 2 == haan"),
            binary(
                binary(num(1.0), TokenKind::Lt, num(2.0)),
                TokenKind::Eq,
                Expr::new(ExprKind::BoolLit(true))
            )
        );
    }

    #[test]
    fn parentheses_regroup() {
        assert_eq!(
            expr("(1 + 2) * 3"),
            binary(binary(num(1.0), TokenKind::Plus, num(2.0)), TokenKind::Star, num(3.0))
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(expr("a = b = c"), assign("a", assign("b", ident("c"))));
    }

    #[test]
    fn compound_assignment_desugars() {
        assert_eq!(
            expr("x += 1"),
            assign("x", binary(ident("x"), TokenKind::Plus, num(1.0)))
        );
        assert_eq!(
            expr("x /= 2"),
            assign("x", binary(ident("x"), TokenKind::Slash, num(2.0)))
        );
    }

    #[test]
    fn assignment_target_must_be_a_name() {
        assert_eq!(expr_err("1 = 2").message, "Invalid assignment target");
        assert_eq!(expr_err("a + b = 2").message, "Invalid assignment target");
        assert_eq!(expr_err("a[0] += 1").message, "Invalid assignment target");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(
            expr("-5"),
            Expr::new(ExprKind::Unary {
                op: TokenKind::Minus,
                arg: Box::new(num(5.0)),
            })
        );
        assert_eq!(
            expr("!!haan"),
            Expr::new(ExprKind::Unary {
                op: TokenKind::Not,
                arg: Box::new(Expr::new(ExprKind::Unary {
                    op: TokenKind::Not,
                    arg: Box::new(Expr::new(ExprKind::BoolLit(true))),
                })),
            })
        );
        // unary binds tighter than binary
        assert_eq!(
            expr("-a * b"),
            binary(
                Expr::new(ExprKind::Unary {
                    op: TokenKind::Minus,
                    arg: Box::new(ident("a")),
                }),
                TokenKind::Star,
                ident("b")
            )
        );
    }

    #[test]
    fn calls_and_builtin_keywords() {
        assert_eq!(
            expr("foo(1, bar)"),
            Expr::new(ExprKind::FnCall {
                ident: "foo".to_string(),
                args: vec![num(1.0), ident("bar")],
            })
        );
        assert_eq!(
            expr("dekh(1)"),
            Expr::new(ExprKind::FnCall {
                ident: "dekh".to_string(),
                args: vec![num(1.0)],
            })
        );
        assert_eq!(expr("band"), ident("band"));
        assert_eq!(expr("lou()").to_string(), "lou()");
    }

    #[test]
    fn array_access_and_literals() {
        assert_eq!(
            expr("xs[i + 1]"),
            Expr::new(ExprKind::ArrayAccess {
                ident: "xs".to_string(),
                index: Box::new(binary(ident("i"), TokenKind::Plus, num(1.0))),
            })
        );
        assert_eq!(
            expr("[1, 2, 3]"),
            Expr::new(ExprKind::ArrayLit(vec![num(1.0), num(2.0), num(3.0)]))
        );
        assert_eq!(expr("[]"), Expr::new(ExprKind::ArrayLit(Vec::new())));
    }

    #[test]
    fn object_literals() {
        assert_eq!(
            expr("{ naam: \"x\", umar: 3 }"),
            Expr::new(ExprKind::ObjectLit(vec![
                ("naam".to_string(), Expr::new(ExprKind::StringLit("x".to_string()))),
                ("umar".to_string(), num(3.0)),
            ]))
        );
        assert_eq!(expr("{}"), Expr::new(ExprKind::ObjectLit(Vec::new())));
    }

    #[test]
    fn postfix_targets_must_be_names() {
        assert_eq!(expr_err("foo()[0]").message, "Invalid array access target");
        assert_eq!(expr_err("foo()(1)").message, "Invalid call target");
        assert_eq!(expr_err("(1 + 2)(3)").message, "Invalid call target");
        // parentheses around a bare name are transparent, so this stays legal
        assert_eq!(
            expr("(foo)(1)"),
            Expr::new(ExprKind::FnCall {
                ident: "foo".to_string(),
                args: vec![num(1.0)],
            })
        );
    }

    #[test]
    fn expected_expression_error_names_the_token() {
        let error = expr_err("+");
        assert_eq!(error.message, "Expected expression at token: +");
        assert_eq!(error.line, 1);
    }

    #[test]
    fn nesting_is_bounded() {
        let mut text = String::new();
        for _ in 0..500 {
            text.push('(');
        }
        text.push('1');
        for _ in 0..500 {
            text.push(')');
        }
        assert_eq!(expr_err(&text).message, "Expression nesting too deep");

        let deep_unary = format!("{}1", "-".repeat(500));
        assert_eq!(expr_err(&deep_unary).message, "Expression nesting too deep");
    }
}
