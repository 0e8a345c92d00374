//! Named built-in functions callable from expressions, e.g. `UPPERCASE(name)`.
//!
//! The registry is process-wide and immutable; it is built once on first use.
//! Every built-in works on strings and carries an explicit null policy, so
//! rules can run over sparse fact maps without tripping over absent values.
//! Arity and type violations are real definition bugs and always fail.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::types::{EvalError, Value};

pub(crate) type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

pub(crate) struct FunctionRegistry {
    functions: HashMap<&'static str, BuiltinFn>,
}

impl FunctionRegistry {
    /// The shared registry instance.
    pub(crate) fn global() -> &'static Self {
        static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::with_builtins)
    }

    fn with_builtins() -> Self {
        let mut functions: HashMap<&'static str, BuiltinFn> = HashMap::new();
        functions.insert("UPPERCASE", uppercase);
        functions.insert("LOWERCASE", lowercase);
        functions.insert("SUBSTRING", substring);
        functions.insert("CONCAT", concat);
        functions.insert("LENGTH", length);
        functions.insert("CONTAINS", contains);
        functions.insert("STARTS_WITH", starts_with);
        functions.insert("ENDS_WITH", ends_with);
        functions.insert("TRIM", trim);
        Self { functions }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<BuiltinFn> {
        self.functions.get(name).copied()
    }
}

fn expect_arity(function: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            function: function.to_owned(),
            expected: expected.to_string(),
            actual: args.len(),
        })
    }
}

/// A string argument under the null policy: `Null` passes through as `None`,
/// anything that is neither null nor a string is a type error.
fn string_or_null<'a>(function: &str, value: &'a Value) -> Result<Option<&'a str>, EvalError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(EvalError::TypeMismatch {
            context: function.to_owned(),
            expected: "string".to_owned(),
            actual: other.type_name().to_owned(),
        }),
    }
}

fn int_arg(function: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(EvalError::TypeMismatch {
            context: function.to_owned(),
            expected: "number".to_owned(),
            actual: other.type_name().to_owned(),
        }),
    }
}

fn uppercase(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("UPPERCASE", args, 1)?;
    Ok(match string_or_null("UPPERCASE", &args[0])? {
        Some(s) => Value::String(s.to_uppercase()),
        None => Value::Null,
    })
}

fn lowercase(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("LOWERCASE", args, 1)?;
    Ok(match string_or_null("LOWERCASE", &args[0])? {
        Some(s) => Value::String(s.to_lowercase()),
        None => Value::Null,
    })
}

fn substring(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("SUBSTRING", args, 3)?;
    let Some(s) = string_or_null("SUBSTRING", &args[0])? else {
        return Ok(Value::Null);
    };
    let start = int_arg("SUBSTRING", &args[1])?;
    let end = int_arg("SUBSTRING", &args[2])?;
    Ok(Value::String(substring_chars(s, start, end)))
}

/// Character-indexed slice. Any bound outside `[0, len]` or an inverted range
/// returns the input unchanged rather than erroring.
pub(crate) fn substring_chars(s: &str, start: i64, end: i64) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;
    if start < 0 || end < 0 || start > len || end > len || start > end {
        return s.to_owned();
    }
    chars[start as usize..end as usize].iter().collect()
}

fn concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut out = String::new();
    for arg in args {
        if let Some(s) = string_or_null("CONCAT", arg)? {
            out.push_str(s);
        }
    }
    Ok(Value::String(out))
}

fn length(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("LENGTH", args, 1)?;
    Ok(match string_or_null("LENGTH", &args[0])? {
        Some(s) => Value::Int(s.chars().count() as i64),
        None => Value::Int(0),
    })
}

fn contains(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("CONTAINS", args, 2)?;
    affix_test("CONTAINS", args, |h, n| h.contains(n))
}

fn starts_with(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("STARTS_WITH", args, 2)?;
    affix_test("STARTS_WITH", args, |h, n| h.starts_with(n))
}

fn ends_with(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("ENDS_WITH", args, 2)?;
    affix_test("ENDS_WITH", args, |h, n| h.ends_with(n))
}

/// Common shape of the two-argument substring tests: a null haystack or
/// needle makes the test false, never an error.
fn affix_test(
    function: &str,
    args: &[Value],
    test: fn(&str, &str) -> bool,
) -> Result<Value, EvalError> {
    let haystack = string_or_null(function, &args[0])?;
    let needle = string_or_null(function, &args[1])?;
    Ok(Value::Bool(match (haystack, needle) {
        (Some(h), Some(n)) => test(h, n),
        _ => false,
    }))
}

fn trim(args: &[Value]) -> Result<Value, EvalError> {
    expect_arity("TRIM", args, 1)?;
    Ok(match string_or_null("TRIM", &args[0])? {
        Some(s) => Value::String(s.trim().to_owned()),
        None => Value::Null,
    })
}
