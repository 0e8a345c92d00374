//! Expression tree evaluation against an execution context.
//!
//! Evaluation is total over the tree but not over the value space: type and
//! arity violations are errors, while missing data is pushed through the
//! `NullPropertyAccess` channel so the executor's null-safety policy can
//! decide whether to recover.

use std::cmp::Ordering;

use crate::functions::{substring_chars, FunctionRegistry};
use crate::types::{CompareOp, EvalError, ExecutionContext, Expr, Value};

pub(crate) fn eval_expr(expr: &Expr, ctx: &ExecutionContext<'_>) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        // An unresolved path is Null here; whether that is benign is decided
        // wherever the Null is consumed.
        Expr::Path(path) => Ok(ctx.resolve(path).cloned().unwrap_or(Value::Null)),
        Expr::And(lhs, rhs) => {
            if !eval_bool_operand(lhs, ctx, "AND")? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(eval_bool_operand(rhs, ctx, "AND")?))
        }
        Expr::Or(lhs, rhs) => {
            if eval_bool_operand(lhs, ctx, "OR")? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(eval_bool_operand(rhs, ctx, "OR")?))
        }
        Expr::Not(inner) => Ok(Value::Bool(!eval_bool_operand(inner, ctx, "NOT")?)),
        Expr::Compare { lhs, op, rhs } => {
            let left = eval_expr(lhs, ctx)?;
            let right = eval_expr(rhs, ctx)?;
            compare(&left, &right, *op, lhs, rhs)
        }
        Expr::Call { name, args } => {
            let function = FunctionRegistry::global()
                .lookup(name)
                .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?;
            let values = args
                .iter()
                .map(|arg| eval_expr(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            function(&values)
        }
        Expr::Method {
            receiver,
            name,
            args,
        } => {
            let target = eval_expr(receiver, ctx)?;
            if target.is_null() {
                return Err(EvalError::NullPropertyAccess {
                    target: name.clone(),
                });
            }
            let values = args
                .iter()
                .map(|arg| eval_expr(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            call_method(&target, name, &values)
        }
    }
}

/// A logical operand must be a present boolean. `Null` is classified as a
/// missing-property failure (suppressible), any other type is a mismatch.
fn eval_bool_operand(
    operand: &Expr,
    ctx: &ExecutionContext<'_>,
    operator: &str,
) -> Result<bool, EvalError> {
    match eval_expr(operand, ctx)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Err(EvalError::NullPropertyAccess {
            target: operand.to_string(),
        }),
        other => Err(EvalError::TypeMismatch {
            context: format!("{operator} operand"),
            expected: "boolean".to_owned(),
            actual: other.type_name().to_owned(),
        }),
    }
}

fn compare(
    left: &Value,
    right: &Value,
    op: CompareOp,
    lhs: &Expr,
    rhs: &Expr,
) -> Result<Value, EvalError> {
    match op {
        // Structural equality: cross-type operands compare unequal, they
        // never error, and null participates like any other value.
        CompareOp::Eq => Ok(Value::Bool(left.loose_eq(right))),
        CompareOp::Neq => Ok(Value::Bool(!left.loose_eq(right))),
        CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => {
            if left.is_null() {
                return Err(EvalError::NullPropertyAccess {
                    target: lhs.to_string(),
                });
            }
            if right.is_null() {
                return Err(EvalError::NullPropertyAccess {
                    target: rhs.to_string(),
                });
            }
            let ordering = left.try_ord(right).ok_or_else(|| EvalError::TypeMismatch {
                context: format!("relational operator {op}"),
                expected: "two numbers or two strings".to_owned(),
                actual: format!("{} and {}", left.type_name(), right.type_name()),
            })?;
            Ok(Value::Bool(match op {
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Gte => ordering != Ordering::Less,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Lte => ordering != Ordering::Greater,
                CompareOp::Eq | CompareOp::Neq => unreachable!(),
            }))
        }
    }
}

fn call_method(receiver: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError> {
    match name {
        "length" => {
            expect_method_arity(name, args, 0)?;
            let s = string_receiver(receiver, name)?;
            Ok(Value::Int(s.chars().count() as i64))
        }
        "toUpperCase" => {
            expect_method_arity(name, args, 0)?;
            Ok(Value::String(string_receiver(receiver, name)?.to_uppercase()))
        }
        "toLowerCase" => {
            expect_method_arity(name, args, 0)?;
            Ok(Value::String(string_receiver(receiver, name)?.to_lowercase()))
        }
        "substring" => {
            let s = string_receiver(receiver, name)?;
            let (start, end) = match args {
                [start] => (method_int(name, start)?, s.chars().count() as i64),
                [start, end] => (method_int(name, start)?, method_int(name, end)?),
                _ => {
                    return Err(EvalError::ArityMismatch {
                        function: name.to_owned(),
                        expected: "1 or 2".to_owned(),
                        actual: args.len(),
                    })
                }
            };
            Ok(Value::String(substring_chars(s, start, end)))
        }
        "toString" => {
            expect_method_arity(name, args, 0)?;
            Ok(Value::String(receiver.render()))
        }
        "size" => {
            expect_method_arity(name, args, 0)?;
            match receiver {
                Value::List(items) => Ok(Value::Int(items.len() as i64)),
                Value::Map(entries) => Ok(Value::Int(entries.len() as i64)),
                other => Err(EvalError::TypeMismatch {
                    context: "size".to_owned(),
                    expected: "list or map".to_owned(),
                    actual: other.type_name().to_owned(),
                }),
            }
        }
        other => Err(EvalError::UnknownFunction {
            name: other.to_owned(),
        }),
    }
}

fn expect_method_arity(name: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            function: name.to_owned(),
            expected: expected.to_string(),
            actual: args.len(),
        })
    }
}

fn string_receiver<'a>(receiver: &'a Value, method: &str) -> Result<&'a str, EvalError> {
    match receiver {
        Value::String(s) => Ok(s),
        other => Err(EvalError::TypeMismatch {
            context: method.to_owned(),
            expected: "string".to_owned(),
            actual: other.type_name().to_owned(),
        }),
    }
}

fn method_int(method: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(EvalError::TypeMismatch {
            context: method.to_owned(),
            expected: "number".to_owned(),
            actual: other.type_name().to_owned(),
        }),
    }
}
