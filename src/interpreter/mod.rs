mod env;
mod error;
mod eval;
mod grammar;
mod parser;
mod tokenizer;
mod value;

pub use env::Env;
pub use error::ScriptError;
pub use eval::{eval_expr, eval_line, eval_program, CapturedPrints, PrintSink};
pub use grammar::{BinaryOp, Expr, Stmt, Token, UnaryOp};
pub use parser::parse;
pub use tokenizer::tokenize;
pub use value::Value;
