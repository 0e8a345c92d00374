use crate::parse::{self, ParseError};

use super::error::DefinitionError;
use super::expr::Expr;

/// A single rule: a condition expression gating a transformation expression
/// that produces one named output variable.
///
/// Both expressions are parsed once at construction time, so malformed rule
/// text surfaces as a [`DefinitionError`] before any execution begins. The
/// original texts are retained for diagnostics.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) condition: Expr,
    pub(crate) transformation: Expr,
    output_variable: String,
    condition_text: String,
    transformation_text: String,
}

impl Rule {
    /// Build a rule from separate condition and transformation expressions.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidExpression`] if either expression
    /// fails to parse.
    pub fn new(
        condition: &str,
        transformation: &str,
        output_variable: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let output_variable = output_variable.into();
        let parsed_condition = parse_part(condition, "condition", &output_variable)?;
        let parsed_transformation = parse_part(transformation, "transformation", &output_variable)?;
        Ok(Self {
            condition: parsed_condition,
            transformation: parsed_transformation,
            output_variable,
            condition_text: condition.trim().to_owned(),
            transformation_text: transformation.trim().to_owned(),
        })
    }

    /// Build a rule from a raw `"condition THEN transformation"` string.
    ///
    /// The keyword `THEN` must appear exactly once; whitespace around each
    /// half is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] on a missing/repeated `THEN` keyword or
    /// a malformed expression.
    pub fn from_text(
        text: &str,
        output_variable: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let (condition, transformation) = split_then(text)?;
        Self::new(condition, transformation, output_variable)
    }

    #[must_use]
    pub fn output_variable(&self) -> &str {
        &self.output_variable
    }

    #[must_use]
    pub fn condition_text(&self) -> &str {
        &self.condition_text
    }

    #[must_use]
    pub fn transformation_text(&self) -> &str {
        &self.transformation_text
    }
}

fn parse_part(
    text: &str,
    part: &'static str,
    output_variable: &str,
) -> Result<Expr, DefinitionError> {
    parse::parse(text).map_err(|source: ParseError| DefinitionError::InvalidExpression {
        output_variable: output_variable.to_owned(),
        part,
        source,
    })
}

/// Split a raw rule string into its condition and transformation halves.
pub(crate) fn split_then(text: &str) -> Result<(&str, &str), DefinitionError> {
    if text.trim().is_empty() {
        return Err(DefinitionError::EmptyRule);
    }
    let mut parts = text.split("THEN");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(condition), Some(transformation), None) => {
            Ok((condition.trim(), transformation.trim()))
        }
        _ => Err(DefinitionError::MalformedRule {
            text: text.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_then_happy_path() {
        let (cond, transform) = split_then("age >= 18 THEN UPPERCASE(name)").unwrap();
        assert_eq!(cond, "age >= 18");
        assert_eq!(transform, "UPPERCASE(name)");
    }

    #[test]
    fn split_then_missing_keyword() {
        assert!(matches!(
            split_then("age >= 18"),
            Err(DefinitionError::MalformedRule { .. })
        ));
    }

    #[test]
    fn split_then_repeated_keyword() {
        assert!(matches!(
            split_then("a THEN b THEN c"),
            Err(DefinitionError::MalformedRule { .. })
        ));
    }

    #[test]
    fn split_then_empty_text() {
        assert!(matches!(split_then("   "), Err(DefinitionError::EmptyRule)));
    }

    #[test]
    fn from_text_builds_rule() {
        let rule = Rule::from_text("age >= 18 THEN UPPERCASE(name)", "name_upper").unwrap();
        assert_eq!(rule.output_variable(), "name_upper");
        assert_eq!(rule.condition_text(), "age >= 18");
        assert_eq!(rule.transformation_text(), "UPPERCASE(name)");
    }

    #[test]
    fn invalid_condition_surfaces_at_definition_time() {
        let err = Rule::new("age >=", "name", "out").unwrap_err();
        match err {
            DefinitionError::InvalidExpression {
                output_variable,
                part,
                ..
            } => {
                assert_eq!(output_variable, "out");
                assert_eq!(part, "condition");
            }
            other => panic!("expected InvalidExpression, got {other}"),
        }
    }

    #[test]
    fn invalid_transformation_surfaces_at_definition_time() {
        let err = Rule::new("true", "CONCAT(", "out").unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::InvalidExpression {
                part: "transformation",
                ..
            }
        ));
    }
}
