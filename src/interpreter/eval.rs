use super::env::Env;
use super::error::ScriptError;
use super::grammar::{BinaryOp, Expr, Stmt, UnaryOp};
use super::parser::parse;
use super::tokenizer::tokenize;
use super::value::Value;

/// Scoped destination for printed text. The sink handle is passed into every
/// evaluation call, so capture cannot leak across lines: there is no global
/// print hook to install or restore.
pub trait PrintSink {
    fn print_line(&mut self, text: &str);
}

/// In-memory sink used by the non-stepped full run and by tests.
#[derive(Debug, Default)]
pub struct CapturedPrints {
    pub lines: Vec<String>,
}

impl CapturedPrints {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrintSink for CapturedPrints {
    fn print_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// Evaluate one line of source as a standalone statement sequence against the
/// run's shared environment. Printed text goes through `sink` the moment it
/// is produced. Returns the value of the line's final statement when that
/// statement is a bare expression.
pub fn eval_line(
    line: &str,
    env: &mut Env,
    sink: &mut dyn PrintSink,
) -> Result<Option<Value>, ScriptError> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let stmts = parse(tokens)?;

    let mut last = None;
    for stmt in &stmts {
        last = exec_stmt(stmt, env, sink)?;
    }
    Ok(last)
}

/// Evaluate a whole program as one unit in one environment. The final value
/// is the value of the last bare expression statement executed, if any.
/// A single failure aborts the whole evaluation.
pub fn eval_program(
    source: &str,
    env: &mut Env,
    sink: &mut dyn PrintSink,
) -> Result<Option<Value>, ScriptError> {
    let tokens = tokenize(source)?;
    let stmts = parse(tokens)?;

    let mut last = None;
    for stmt in &stmts {
        if let Some(value) = exec_stmt(stmt, env, sink)? {
            last = Some(value);
        }
    }
    Ok(last)
}

fn exec_stmt(
    stmt: &Stmt,
    env: &mut Env,
    sink: &mut dyn PrintSink,
) -> Result<Option<Value>, ScriptError> {
    match stmt {
        Stmt::Let(name, expr) => {
            let value = eval_expr(expr, env)?;
            env.declare(name, value)?;
            Ok(None)
        }
        Stmt::Assign(name, expr) => {
            let value = eval_expr(expr, env)?;
            env.assign(name, value)?;
            Ok(None)
        }
        Stmt::Print(args) => {
            // Arguments evaluate left to right and join with a single space.
            let mut parts = Vec::with_capacity(args.len());
            for arg in args {
                parts.push(eval_expr(arg, env)?.to_string());
            }
            sink.print_line(&parts.join(" "));
            Ok(None)
        }
        Stmt::Expr(expr) => Ok(Some(eval_expr(expr, env)?)),
    }
}

pub fn eval_expr(expr: &Expr, env: &Env) -> Result<Value, ScriptError> {
    match expr {
        Expr::Number(n) => Ok(Value::Num(*n)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Var(name) => env.get(name),

        Expr::Unary(op, inner) => {
            let value = eval_expr(inner, env)?;
            match (op, value) {
                (UnaryOp::Neg, Value::Num(n)) => Ok(Value::Num(-n)),
                (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnaryOp::Neg, other) => Err(ScriptError::TypeError(format!(
                    "cannot negate a {}",
                    other.type_name()
                ))),
                (UnaryOp::Not, other) => Err(ScriptError::TypeError(format!(
                    "cannot apply `!` to a {}",
                    other.type_name()
                ))),
            }
        }

        Expr::Binary(lhs, op, rhs) => match op {
            // Logical operators short-circuit.
            BinaryOp::And | BinaryOp::Or => {
                let left = as_bool(eval_expr(lhs, env)?, op)?;
                if (*op == BinaryOp::And && !left) || (*op == BinaryOp::Or && left) {
                    return Ok(Value::Bool(left));
                }
                let right = as_bool(eval_expr(rhs, env)?, op)?;
                Ok(Value::Bool(right))
            }
            _ => {
                let left = eval_expr(lhs, env)?;
                let right = eval_expr(rhs, env)?;
                eval_binary(left, *op, right)
            }
        },
    }
}

fn eval_binary(left: Value, op: BinaryOp, right: Value) -> Result<Value, ScriptError> {
    match op {
        BinaryOp::Add => match (&left, &right) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
            // `+` concatenates when either operand is a string.
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::Str(format!("{}{}", left, right)))
            }
            _ => Err(type_mismatch("+", &left, &right)),
        },

        BinaryOp::Sub => num_op(&left, &right, "-", |a, b| Ok(Value::Num(a - b))),
        BinaryOp::Mul => num_op(&left, &right, "*", |a, b| Ok(Value::Num(a * b))),
        BinaryOp::Div => num_op(&left, &right, "/", |a, b| {
            if b == 0.0 {
                Err(ScriptError::DivisionByZero)
            } else {
                Ok(Value::Num(a / b))
            }
        }),
        BinaryOp::Rem => num_op(&left, &right, "%", |a, b| {
            if b == 0.0 {
                Err(ScriptError::DivisionByZero)
            } else {
                Ok(Value::Num(a % b))
            }
        }),

        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),

        BinaryOp::Lt => num_op(&left, &right, "<", |a, b| Ok(Value::Bool(a < b))),
        BinaryOp::Le => num_op(&left, &right, "<=", |a, b| Ok(Value::Bool(a <= b))),
        BinaryOp::Gt => num_op(&left, &right, ">", |a, b| Ok(Value::Bool(a > b))),
        BinaryOp::Ge => num_op(&left, &right, ">=", |a, b| Ok(Value::Bool(a >= b))),

        BinaryOp::And | BinaryOp::Or => unreachable!("logical operators short-circuit earlier"),
    }
}

fn num_op(
    left: &Value,
    right: &Value,
    symbol: &str,
    apply: impl Fn(f64, f64) -> Result<Value, ScriptError>,
) -> Result<Value, ScriptError> {
    match (left, right) {
        (Value::Num(a), Value::Num(b)) => apply(*a, *b),
        _ => Err(type_mismatch(symbol, left, right)),
    }
}

fn type_mismatch(symbol: &str, left: &Value, right: &Value) -> ScriptError {
    ScriptError::TypeError(format!(
        "`{}` is not defined for {} and {}",
        symbol,
        left.type_name(),
        right.type_name()
    ))
}

fn as_bool(value: Value, op: &BinaryOp) -> Result<bool, ScriptError> {
    let symbol = if *op == BinaryOp::And { "&&" } else { "||" };
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(ScriptError::TypeError(format!(
            "`{}` expects booleans, got {}",
            symbol,
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_lines(lines: &[&str]) -> (Env, CapturedPrints, Option<Value>) {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let mut last = None;
        for line in lines {
            last = eval_line(line, &mut env, &mut sink).expect("line should evaluate");
        }
        (env, sink, last)
    }

    #[test]
    fn bindings_persist_across_lines() {
        let (_, sink, _) = eval_lines(&["let x = 1;", "x = x + 1;", "print(x);"]);
        assert_eq!(sink.lines, vec!["2"]);
    }

    #[test]
    fn bare_expression_reports_its_value() {
        let (_, _, last) = eval_lines(&["let x = 20;", "x * 2 + 2"]);
        assert_eq!(last, Some(Value::Num(42.0)));
    }

    #[test]
    fn let_and_assignment_produce_no_value() {
        let (_, _, last) = eval_lines(&["let x = 1;"]);
        assert_eq!(last, None);
        let (_, _, last) = eval_lines(&["let x = 1;", "x = 5;"]);
        assert_eq!(last, None);
    }

    #[test]
    fn print_joins_arguments_with_a_space() {
        let (_, sink, _) = eval_lines(&["let x = 3;", "print(\"x is\", x, x < 5);"]);
        assert_eq!(sink.lines, vec!["x is 3 true"]);
    }

    #[test]
    fn empty_print_emits_an_empty_line() {
        let (_, sink, _) = eval_lines(&["print();"]);
        assert_eq!(sink.lines, vec![""]);
    }

    #[test]
    fn string_concatenation() {
        let (_, sink, _) = eval_lines(&["print(\"n=\" + 4);"]);
        assert_eq!(sink.lines, vec!["n=4"]);
    }

    #[test]
    fn undefined_variable_is_reported() {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let err = eval_line("print(missing);", &mut env, &mut sink).unwrap_err();
        assert_eq!(err, ScriptError::UndefinedVariable("missing".to_string()));
        assert!(sink.lines.is_empty(), "failed line must print nothing");
    }

    #[test]
    fn division_by_zero_is_reported() {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let err = eval_line("1 / 0", &mut env, &mut sink).unwrap_err();
        assert_eq!(err, ScriptError::DivisionByZero);
    }

    #[test]
    fn logical_operators_short_circuit() {
        // The rhs would be a type error if evaluated.
        let (_, _, last) = eval_lines(&["false && (1 + true == 2)"]);
        assert_eq!(last, Some(Value::Bool(false)));
        let (_, _, last) = eval_lines(&["true || (1 + true == 2)"]);
        assert_eq!(last, Some(Value::Bool(true)));
    }

    #[test]
    fn whole_program_final_value_skips_declarations() {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let last = eval_program("let a = 6;\nlet b = 7;\na * b\nlet c = 0;", &mut env, &mut sink)
            .expect("program should evaluate");
        assert_eq!(last, Some(Value::Num(42.0)));
    }

    #[test]
    fn whole_program_failure_aborts() {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let result = eval_program("print(\"a\");\nboom;\nprint(\"b\");", &mut env, &mut sink);
        assert!(result.is_err(), "undefined variable should abort");
        // Output printed before the failure was still captured.
        assert_eq!(sink.lines, vec!["a"]);
    }

    #[test]
    fn comments_evaluate_to_nothing() {
        let mut env = Env::new();
        let mut sink = CapturedPrints::new();
        let last = eval_line("// nothing", &mut env, &mut sink).expect("comment is a no-op");
        assert_eq!(last, None);
        assert!(sink.lines.is_empty());
    }
}
