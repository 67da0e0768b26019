// program    ::= statement*

// statement  ::= "let" identifier "=" expression ";"?
//              | identifier "=" expression ";"?
//              | "print" "(" arg_list? ")" ";"?
//              | expression ";"?

// arg_list   ::= expression ("," expression)*

// expression ::= or_expr
// or_expr    ::= and_expr ("||" and_expr)*
// and_expr   ::= equality ("&&" equality)*
// equality   ::= comparison (("==" | "!=") comparison)*
// comparison ::= additive (("<" | ">" | "<=" | ">=") additive)*
// additive   ::= term (("+" | "-") term)*
// term       ::= unary (("*" | "/" | "%") unary)*
// unary      ::= ("-" | "!") unary | primary
// primary    ::= number | string | "true" | "false" | identifier
//              | "(" expression ")"

// identifier ::= [a-zA-Z_][a-zA-Z0-9_]*
// number     ::= [0-9]+ ("." [0-9]+)?
// string     ::= '"' ... '"' | "'" ... "'"
// comment    ::= "//" .* end-of-line

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Let,
    Print,
    True,
    False,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AndAnd,
    OrOr,
    LParen,
    RParen,
    Comma,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Let => write!(f, "let"),
            Token::Print => write!(f, "print"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Bang => write!(f, "!"),
            Token::Equal => write!(f, "="),
            Token::EqualEqual => write!(f, "=="),
            Token::BangEqual => write!(f, "!="),
            Token::Less => write!(f, "<"),
            Token::LessEqual => write!(f, "<="),
            Token::Greater => write!(f, ">"),
            Token::GreaterEqual => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Var(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(String, Expr),
    Assign(String, Expr),
    Print(Vec<Expr>),
    Expr(Expr),
}
