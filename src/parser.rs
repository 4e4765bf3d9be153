//! # Parser
//!
//! A recursive-descent parser that turns a token sequence into a [`Program`].
//! A single mutable cursor (`position`) advances through the token buffer;
//! `peek(k)` looks ahead without consuming, `consume()` advances
//! unconditionally, and `match_consume(kind)` advances only when the current
//! token matches.


use crate::ast::{BinaryOp, Expr, FunctionExpr, Param, Program, Stmt, UnaryOp};
use crate::error::{ParseError, Span};
use crate::token::{Token, TokenKind};
use crate::types::{FunctionSignature, Type};

pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    Ok(program)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    fn peek(&self, k: usize) -> &Token {
        let idx = (self.position + k).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn consume(&mut self) -> Token {
        let token = self.tokens[self.position.min(self.tokens.len() - 1)].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn match_consume(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.consume();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, ParseError> {
        if &self.current().kind == kind {
            Ok(self.consume())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let span = self.current().span;
        ParseError {
            message: message.into(),
            span,
        }
    }

    fn error_at(&self, span: Span, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            span,
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while self.current().kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match &self.current().kind {
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::Identifier => self.parse_identifier_statement(),
            _ => Err(self.error("expected a statement")),
        }
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.consume(); // 'return'
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "';' after return statement")?;
        Ok(Stmt::Return(expr))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.consume(); // 'if'
        self.expect(&TokenKind::LeftParen, "'(' after 'if'")?;
        let predicate = self.parse_expr()?;
        self.expect(&TokenKind::RightParen, "')' after if condition")?;
        let body = self.parse_block()?;
        Ok(Stmt::If { predicate, body })
    }

    /// Dispatches on up to three tokens of lookahead: `identifier ':' '='`
    /// is a function declaration, `identifier ':' <anything else>` is a
    /// variable declaration, and `identifier <anything else>` is an
    /// assignment.
    fn parse_identifier_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.peek(1).kind == TokenKind::Colon {
            if self.peek(2).kind == TokenKind::Assign {
                return self.parse_function_decl();
            }
            return self.parse_variable_decl();
        }
        self.parse_assignment()
    }

    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume().lexeme; // identifier
        self.consume(); // ':'
        self.consume(); // '='
        let function = self.parse_function_expr()?;
        Ok(Stmt::FunctionDecl { name, function })
    }

    fn parse_variable_decl(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume().lexeme; // identifier
        self.consume(); // ':'
        let mutable = self.match_consume(&TokenKind::Mutable);
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Assign, "'=' in variable declaration")?;
        let init = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Stmt::VariableDecl {
            name,
            mutable,
            ty,
            init,
        })
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume().lexeme; // identifier
        self.expect(&TokenKind::Assign, "'=' in assignment")?;
        let value = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "';' after assignment")?;
        Ok(Stmt::Assignment { name, value })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LeftCurly, "'{' to start a block")?;
        let mut statements = Vec::new();
        while self.current().kind != TokenKind::RightCurly {
            if self.current().kind == TokenKind::Eof {
                return Err(self.error("unterminated block"));
            }
            statements.push(self.parse_statement()?);
        }
        self.consume(); // '}'
        Ok(statements)
    }

    fn parse_function_expr(&mut self) -> Result<FunctionExpr, ParseError> {
        self.expect(&TokenKind::LeftParen, "'(' to start a function's parameter list")?;
        let mut params = Vec::new();
        if self.current().kind != TokenKind::RightParen {
            loop {
                let name = self.expect(&TokenKind::Identifier, "a parameter name")?.lexeme;
                self.expect(&TokenKind::Colon, "':' after parameter name")?;
                let ty = self.parse_type()?;
                params.push(Param { name, ty });
                if !self.match_consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen, "')' to close a parameter list")?;
        self.expect(&TokenKind::RightArrow, "'->' before a function's return type")?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;
        Ok(FunctionExpr {
            params,
            return_type,
            body,
        })
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        match &self.current().kind {
            TokenKind::I32 if self.current().lexeme == "i32" => {
                self.consume();
                Ok(Type::I32)
            }
            TokenKind::F32 => {
                self.consume();
                Ok(Type::F32)
            }
            TokenKind::LeftParen => self.parse_function_type(),
            _ => Err(self.error("expected a type")),
        }
    }

    fn parse_function_type(&mut self) -> Result<Type, ParseError> {
        self.consume(); // '('
        let mut params = Vec::new();
        if self.current().kind != TokenKind::RightParen {
            loop {
                params.push(self.parse_type()?);
                if !self.match_consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen, "')' to close a function type's parameter list")?;
        self.expect(&TokenKind::RightArrow, "'->' in a function type")?;
        let return_type = self.parse_type()?;
        Ok(Type::Function(FunctionSignature {
            params,
            return_type: Box::new(return_type),
        }))
    }

    // --- Expression grammar, lowest to highest precedence ---

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_logical_and()?;
        if self.match_consume(&TokenKind::Or) {
            let right = self.parse_logical_and()?;
            return Ok(Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_equality()?;
        if self.match_consume(&TokenKind::And) {
            let right = self.parse_equality()?;
            return Ok(Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_relational()?;
        if self.match_consume(&TokenKind::Equality) {
            let right = self.parse_relational()?;
            return Ok(Expr::Binary(BinaryOp::Equal, Box::new(left), Box::new(right)));
        }
        if self.match_consume(&TokenKind::NotEquality) {
            let right = self.parse_relational()?;
            return Ok(Expr::Binary(
                BinaryOp::NotEqual,
                Box::new(left),
                Box::new(right),
            ));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.consume();
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.consume();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Asterisk => BinaryOp::Mul,
                TokenKind::Divide => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.consume();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current().kind {
            TokenKind::Exclamation => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Negate),
            _ => None,
        };
        if let Some(op) = op {
            self.consume();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(op, Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current().kind {
            TokenKind::I32 => {
                let token = self.consume();
                let value: i32 = token.lexeme.parse().map_err(|_| {
                    self.error_at(token.span, format!("invalid integer literal '{}'", token.lexeme))
                })?;
                Ok(Expr::Literal(Type::I32, value))
            }
            TokenKind::Identifier => {
                if self.peek(1).kind == TokenKind::LeftParen {
                    self.parse_call()
                } else {
                    Ok(Expr::Variable(self.consume().lexeme))
                }
            }
            TokenKind::LeftParen => self.parse_paren_or_function_expr(),
            _ => Err(self.error("expected an expression")),
        }
    }

    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let name = self.consume().lexeme; // identifier
        self.consume(); // '('
        let mut args = Vec::new();
        if self.current().kind != TokenKind::RightParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen, "')' to close a call's argument list")?;
        Ok(Expr::Call(name, args))
    }

    /// Inside `primary`, an opening `(` starts a function expression if the
    /// tokens that follow match `)` (no parameters) or `identifier ':'` (at
    /// least one typed parameter); otherwise it is a parenthesised
    /// expression.
    fn parse_paren_or_function_expr(&mut self) -> Result<Expr, ParseError> {
        let is_function = self.peek(1).kind == TokenKind::RightParen
            || (self.peek(1).kind == TokenKind::Identifier && self.peek(2).kind == TokenKind::Colon);
        if is_function {
            let function = self.parse_function_expr()?;
            return Ok(Expr::Function(function));
        }
        self.consume(); // '('
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RightParen, "')' to close a parenthesised expression")?;
        Ok(expr)
    }
}
