use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::RuleflowError;
use crate::execute::{self, ExecutionOptions};

use super::error::{DefinitionError, ExecutionError};
use super::rule::Rule;
use super::value::Value;

/// Builder for constructing a [`Ruleset`] from raw rule texts.
///
/// Raw texts are collected as-is; all splitting and expression parsing
/// happens in [`build()`](Self::build), so every definition error surfaces
/// in one place before execution.
///
/// # Example
///
/// ```
/// use ruleflow::RulesetBuilder;
///
/// let ruleset = RulesetBuilder::new("eligibility")
///     .rule("age >= 18 THEN UPPERCASE(name)", "name_upper")
///     .rule("age >= 21 THEN CONCAT(\"Mr. \", name_upper)", "formal")
///     .build()
///     .unwrap();
/// assert_eq!(ruleset.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RulesetBuilder {
    name: String,
    rules: Vec<(String, String)>,
}

impl RulesetBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append a `"condition THEN transformation"` rule producing the given
    /// output variable. Order of calls is execution order.
    #[must_use]
    pub fn rule(mut self, text: &str, output_variable: &str) -> Self {
        self.rules
            .push((text.to_owned(), output_variable.to_owned()));
        self
    }

    /// Parse all collected rules into an immutable `Ruleset`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if any rule is malformed or if no rules
    /// were added.
    pub fn build(self) -> Result<Ruleset, DefinitionError> {
        let rules = self
            .rules
            .iter()
            .map(|(text, output)| Rule::from_text(text, output))
            .collect::<Result<Vec<_>, _>>()?;
        Ruleset::new(self.name, rules)
    }
}

/// A named, ordered, immutable collection of rules.
///
/// Thread-safe and designed to live behind `Arc`: concurrent executions
/// share the definitions read-only and each get a fresh context.
#[derive(Debug)]
pub struct Ruleset {
    name: String,
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Assemble a ruleset from pre-built rules.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyRuleset`] if `rules` is empty.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Result<Self, DefinitionError> {
        let name = name.into();
        if rules.is_empty() {
            return Err(DefinitionError::EmptyRuleset { name });
        }
        Ok(Self { name, rules })
    }

    /// Deserialize a ruleset from its JSON wire shape:
    ///
    /// ```json
    /// {"name": "eligibility",
    ///  "rules": [{"rule": "age >= 18 THEN UPPERCASE(name)",
    ///             "outputVariable": "name_upper"}]}
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RuleflowError`] on malformed JSON or rule definitions.
    pub fn from_json(json: &str) -> Result<Self, RuleflowError> {
        let spec: RulesetSpec = serde_json::from_str(json)?;
        let rules = spec
            .rules
            .iter()
            .map(|r| Rule::from_text(&r.rule, &r.output_variable))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(spec.name, rules)?)
    }

    /// Read a JSON file and deserialize the ruleset it contains.
    ///
    /// # Errors
    ///
    /// Returns [`RuleflowError`] on I/O, JSON, or definition failure.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, RuleflowError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Execute this ruleset against the given facts with null-safe
    /// evaluation (the default policy).
    ///
    /// Returns the map of output variables written by rules whose condition
    /// held; a rule that did not fire leaves no key.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when a rule fails fatally; any partial
    /// output is discarded.
    pub fn execute(
        &self,
        facts: &HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>, ExecutionError> {
        execute::execute_rules(&self.rules, facts, &ExecutionOptions::default())
    }

    /// Execute with explicit options (e.g. strict, non-null-safe mode).
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when a rule fails fatally.
    pub fn execute_with(
        &self,
        facts: &HashMap<String, Value>,
        options: &ExecutionOptions,
    ) -> Result<HashMap<String, Value>, ExecutionError> {
        execute::execute_rules(&self.rules, facts, options)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ruleset({}, {} rules)", self.name, self.rules.len())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RulesetSpec {
    name: String,
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleSpec {
    rule: String,
    output_variable: String,
}
