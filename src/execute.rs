//! Ordered execution of a rule list against a facts map.
//!
//! Each run gets a fresh two-layer context; outputs written by earlier rules
//! are visible to the conditions and transformations of later ones. Under
//! the default null-safe policy a missing-property failure downgrades to a
//! false condition or a null transformation result. Every other evaluation
//! error aborts the run and discards any partial output.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::evaluate::eval_expr;
use crate::types::{EvalError, ExecutionContext, ExecutionError, Rule, Value};

/// Execution policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOptions {
    /// When set (the default), a `NullPropertyAccess` failure makes the
    /// condition false or the transformation null instead of failing the run.
    pub null_safe: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self { null_safe: true }
    }
}

impl ExecutionOptions {
    /// Strict mode: missing-property failures abort like any other error.
    #[must_use]
    pub fn strict() -> Self {
        Self { null_safe: false }
    }
}

/// Run `rules` in order against `facts`, returning the map of outputs from
/// rules whose condition held. A rule that did not fire leaves no key, so
/// callers can distinguish "did not fire" from "fired and produced null".
///
/// # Errors
///
/// Returns [`ExecutionError`] naming the failing rule on the first fatal
/// evaluation error; no partial output is returned.
pub fn execute_rules(
    rules: &[Rule],
    facts: &HashMap<String, Value>,
    options: &ExecutionOptions,
) -> Result<HashMap<String, Value>, ExecutionError> {
    let mut ctx = ExecutionContext::new(facts);
    let mut output = HashMap::new();

    for rule in rules {
        debug!(
            output_variable = rule.output_variable(),
            condition = rule.condition_text(),
            "evaluating rule"
        );

        if !condition_holds(rule, &ctx, options)? {
            continue;
        }

        let value = match eval_expr(&rule.transformation, &ctx) {
            Ok(v) => v,
            Err(e) if options.null_safe && e.is_null_property_access() => {
                warn!(
                    output_variable = rule.output_variable(),
                    error = %e,
                    "null-safe: transformation degraded to null"
                );
                Value::Null
            }
            Err(e) => return Err(ExecutionError::new(rule, e)),
        };

        debug!(output_variable = rule.output_variable(), value = %value, "rule fired");
        ctx.set_output(rule.output_variable(), value.clone());
        output.insert(rule.output_variable().to_owned(), value);
    }

    Ok(output)
}

fn condition_holds(
    rule: &Rule,
    ctx: &ExecutionContext<'_>,
    options: &ExecutionOptions,
) -> Result<bool, ExecutionError> {
    match eval_expr(&rule.condition, ctx) {
        Ok(Value::Bool(b)) => Ok(b),
        // A condition that evaluates all the way to null is the same missing
        // data the null-safety policy exists for.
        Ok(Value::Null) => suppress_or_fail(
            rule,
            options,
            EvalError::NullPropertyAccess {
                target: rule.condition_text().to_owned(),
            },
        ),
        Ok(other) => Err(ExecutionError::new(
            rule,
            EvalError::TypeMismatch {
                context: "condition".to_owned(),
                expected: "boolean".to_owned(),
                actual: other.type_name().to_owned(),
            },
        )),
        Err(e) if e.is_null_property_access() => suppress_or_fail(rule, options, e),
        Err(e) => Err(ExecutionError::new(rule, e)),
    }
}

fn suppress_or_fail(
    rule: &Rule,
    options: &ExecutionOptions,
    error: EvalError,
) -> Result<bool, ExecutionError> {
    if options.null_safe {
        warn!(
            output_variable = rule.output_variable(),
            error = %error,
            "null-safe: condition treated as false"
        );
        Ok(false)
    } else {
        Err(ExecutionError::new(rule, error))
    }
}
