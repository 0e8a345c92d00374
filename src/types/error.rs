use thiserror::Error;

use crate::parse::ParseError;

use super::rule::Rule;

/// Errors raised while evaluating an expression.
///
/// `NullPropertyAccess` is the only recoverable kind: under the null-safety
/// policy the executor turns it into a false condition or a null
/// transformation result. Everything else always aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("null value encountered in '{target}'")]
    NullPropertyAccess { target: String },

    #[error("type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("'{function}' expected {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
}

impl EvalError {
    /// Whether the null-safety policy may suppress this error.
    #[must_use]
    pub fn is_null_property_access(&self) -> bool {
        matches!(self, EvalError::NullPropertyAccess { .. })
    }
}

/// Errors raised while defining rules or building a ruleset.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("rule text cannot be empty")]
    EmptyRule,

    #[error("rule must contain the 'THEN' keyword exactly once: '{text}'")]
    MalformedRule { text: String },

    #[error("invalid {part} expression for output '{output_variable}': {source}")]
    InvalidExpression {
        output_variable: String,
        part: &'static str,
        source: ParseError,
    },

    #[error("ruleset '{name}' has no rules")]
    EmptyRuleset { name: String },
}

/// A fatal rule failure, carrying the rule's identity and source text so the
/// caller can pinpoint the offending definition.
#[derive(Debug, Error)]
#[error("rule '{output_variable}' failed: {source} (condition: '{condition}', transformation: '{transformation}')")]
pub struct ExecutionError {
    pub output_variable: String,
    pub condition: String,
    pub transformation: String,
    pub source: EvalError,
}

impl ExecutionError {
    pub(crate) fn new(rule: &Rule, source: EvalError) -> Self {
        Self {
            output_variable: rule.output_variable().to_owned(),
            condition: rule.condition_text().to_owned(),
            transformation: rule.transformation_text().to_owned(),
            source,
        }
    }
}
