//! A small rule execution engine.
//!
//! Rules are written as `condition THEN transformation` strings. Conditions
//! and transformations share one expression language: literals, property
//! paths into nested facts (`users[0].name`), comparison and logical
//! operators, named functions (`UPPERCASE(name)`), and method-style calls
//! (`name.substring(0, 3)`).
//!
//! A [`Ruleset`] is parsed once and is immutable afterwards; each
//! [`execute`](Ruleset::execute) call runs the rules in order against a
//! caller-supplied facts map. Outputs written by earlier rules are visible
//! to later ones, and under the default null-safe policy a rule touching
//! missing data quietly does not fire instead of failing the run.
//!
//! ```
//! use ruleflow::{facts_from_json, RulesetBuilder, Value};
//!
//! let ruleset = RulesetBuilder::new("greeting")
//!     .rule("age >= 18 THEN UPPERCASE(name)", "name_upper")
//!     .rule("age >= 21 THEN CONCAT(\"Mr. \", name_upper)", "formal")
//!     .build()
//!     .unwrap();
//!
//! let facts = facts_from_json(r#"{"name": "smith", "age": 25}"#).unwrap();
//! let output = ruleset.execute(&facts).unwrap();
//!
//! assert_eq!(output["name_upper"], Value::from("SMITH"));
//! assert_eq!(output["formal"], Value::from("Mr. SMITH"));
//! ```

mod error;
mod evaluate;
mod execute;
mod functions;
mod types;

pub mod parse;

pub use error::RuleflowError;
pub use execute::{execute_rules, ExecutionOptions};
pub use parse::ParseError;
pub use types::{
    facts_from_json, CompareOp, DefinitionError, EvalError, ExecutionError, Expr, Path, Rule,
    Ruleset, RulesetBuilder, Segment, Value,
};
