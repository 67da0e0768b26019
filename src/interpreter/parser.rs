use super::error::ScriptError;
use super::grammar::{BinaryOp, Expr, Stmt, Token, UnaryOp};

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ScriptError> {
        match self.next() {
            Some(ref tok) if tok == expected => Ok(()),
            Some(tok) => Err(ScriptError::UnexpectedToken(tok.to_string())),
            None => Err(ScriptError::UnexpectedEnd),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ScriptError> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name),
            Some(tok) => Err(ScriptError::UnexpectedToken(tok.to_string())),
            None => Err(ScriptError::UnexpectedEnd),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ScriptError> {
        match self.peek() {
            Some(Token::Let) => {
                self.next();
                let name = self.expect_ident()?;
                self.expect(&Token::Equal)?;
                let expr = self.parse_expr()?;
                Ok(Stmt::Let(name, expr))
            }

            Some(Token::Print) => {
                self.next();
                self.expect(&Token::LParen)?;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::RParen) {
                    loop {
                        args.push(self.parse_expr()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&Token::RParen)?;
                Ok(Stmt::Print(args))
            }

            Some(Token::Ident(_)) if self.peek_at(1) == Some(&Token::Equal) => {
                let name = self.expect_ident()?;
                self.next(); // '='
                let expr = self.parse_expr()?;
                Ok(Stmt::Assign(name, expr))
            }

            Some(_) => Ok(Stmt::Expr(self.parse_expr()?)),

            None => Err(ScriptError::UnexpectedEnd),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ScriptError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let rhs = self.parse_and()?;
            expr = Expr::Binary(Box::new(expr), BinaryOp::Or, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_equality()?;
        while self.eat(&Token::AndAnd) {
            let rhs = self.parse_equality()?;
            expr = Expr::Binary(Box::new(expr), BinaryOp::And, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqualEqual) => BinaryOp::Eq,
                Some(Token::BangEqual) => BinaryOp::Ne,
                _ => break,
            };
            self.next();
            let rhs = self.parse_comparison()?;
            expr = Expr::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Less) => BinaryOp::Lt,
                Some(Token::LessEqual) => BinaryOp::Le,
                Some(Token::Greater) => BinaryOp::Gt,
                Some(Token::GreaterEqual) => BinaryOp::Ge,
                _ => break,
            };
            self.next();
            let rhs = self.parse_additive()?;
            expr = Expr::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.next();
            let rhs = self.parse_term()?;
            expr = Expr::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.next();
            let rhs = self.parse_unary()?;
            expr = Expr::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        if self.eat(&Token::Minus) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(inner)));
        }
        if self.eat(&Token::Bang) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Ident(name)) => Ok(Expr::Var(name)),
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(tok) => Err(ScriptError::UnexpectedToken(tok.to_string())),
            None => Err(ScriptError::UnexpectedEnd),
        }
    }
}

/// Parse a token stream into a statement sequence. Semicolons terminate
/// statements but are optional before end of input.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, ScriptError> {
    let mut parser = Parser::new(tokens);
    let mut stmts = Vec::new();

    while parser.peek().is_some() {
        while parser.eat(&Token::Semicolon) {}
        if parser.peek().is_none() {
            break;
        }
        stmts.push(parser.parse_statement()?);
        while parser.eat(&Token::Semicolon) {}
    }

    Ok(stmts)
}
