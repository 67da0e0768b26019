use thiserror::Error;

/// Failure of a single evaluation: tokenizing, parsing, or running.
/// The controller renders these inline and keeps going; they never
/// abort a stepped run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScriptError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("variable `{0}` is already declared")]
    AlreadyDeclared(String),
    #[error("type error: {0}")]
    TypeError(String),
    #[error("division by zero")]
    DivisionByZero,
}
