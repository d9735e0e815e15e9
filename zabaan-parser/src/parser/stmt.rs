use super::*;

impl Parser {
    /// Parses a statement, dispatching on the leading keyword.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.enter_nested("Statement")?;
        let result = self.parse_statement_inner();
        self.depth -= 1;
        result
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        if self.eat(&TokenKind::Banao) {
            return self.parse_var_declaration();
        }
        if self.eat(&TokenKind::Kaam) {
            return self.parse_fn_declaration();
        }
        if self.eat(&TokenKind::Agar) {
            return self.parse_if_statement();
        }
        if self.eat(&TokenKind::Daura) {
            return self.parse_loop_statement();
        }
        if self.eat(&TokenKind::Wapas) {
            return self.parse_return_statement();
        }
        if self.check(&TokenKind::LBrace) {
            return self.parse_block_statement();
        }
        self.parse_expression_statement()
    }

    fn parse_var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let ident = self.consume_identifier("Expected identifier")?;
        let initializer = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(
            &TokenKind::Semicolon,
            "Expected ';' after variable declaration",
        )?;
        Ok(Stmt::VarDeclaration { ident, initializer })
    }

    fn parse_fn_declaration(&mut self) -> Result<Stmt, ParseError> {
        let ident = self.consume_identifier("Expected function name")?;

        self.consume(&TokenKind::LParen, "Expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.consume_identifier("Expected parameter name")?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RParen, "Expected ')' after parameters")?;

        self.consume(&TokenKind::LBrace, "Expected '{' before function body")?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.consume(&TokenKind::RBrace, "Expected '}' after function body")?;

        Ok(Stmt::FnDeclaration {
            ident,
            params,
            body,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(&TokenKind::LParen, "Expected '(' after 'agar'")?;
        let condition = self.parse_expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after if condition")?;

        self.consume(&TokenKind::LBrace, "Expected '{' before if body")?;
        let mut then_branch = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            then_branch.push(self.parse_statement()?);
        }
        self.consume(&TokenKind::RBrace, "Expected '}' after if body")?;

        let mut else_branch = Vec::new();
        if self.eat(&TokenKind::Warnah) {
            self.consume(&TokenKind::LBrace, "Expected '{' before else body")?;
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                else_branch.push(self.parse_statement()?);
            }
            self.consume(&TokenKind::RBrace, "Expected '}' after else body")?;
        }

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_loop_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(&TokenKind::LParen, "Expected '(' after 'daura'")?;
        let condition = self.parse_expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after loop condition")?;

        self.consume(&TokenKind::LBrace, "Expected '{' before loop body")?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.consume(&TokenKind::RBrace, "Expected '}' after loop body")?;

        Ok(Stmt::Loop { condition, body })
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = if !self.check(&TokenKind::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(&TokenKind::Semicolon, "Expected ';' after return statement")?;
        Ok(Stmt::ReturnStmt(value))
    }

    /// A bare brace block is a real statement: its body is kept and the
    /// analyzer gives it a scope of its own.
    fn parse_block_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(&TokenKind::LBrace, "Expected '{'")?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.consume(&TokenKind::RBrace, "Expected '}'")?;
        Ok(Stmt::Block(statements))
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        self.consume(
            &TokenKind::Semicolon,
            "Expected ';' after expression statement",
        )?;
        Ok(Stmt::ExprStmt(expr))
    }
}
