//! The null-safety policy: which failures it suppresses, which it never
//! touches, and how strict mode changes the answer.

use std::collections::HashMap;

use ruleflow::{
    facts_from_json, EvalError, ExecutionOptions, RulesetBuilder, Value,
};

#[test]
fn missing_key_in_condition_is_suppressed() {
    let ruleset = RulesetBuilder::new("r")
        .rule("age >= 18 THEN \"adult\"", "status")
        .build()
        .unwrap();
    let output = ruleset.execute(&HashMap::new()).unwrap();
    assert!(output.is_empty());
}

#[test]
fn missing_key_in_condition_fails_strict() {
    let ruleset = RulesetBuilder::new("r")
        .rule("age >= 18 THEN \"adult\"", "status")
        .build()
        .unwrap();
    let err = ruleset
        .execute_with(&HashMap::new(), &ExecutionOptions::strict())
        .unwrap_err();
    assert_eq!(err.output_variable, "status");
    assert_eq!(err.condition, "age >= 18");
    assert!(err.source.is_null_property_access());
}

#[test]
fn method_on_missing_receiver_in_condition_is_suppressed() {
    let ruleset = RulesetBuilder::new("r")
        .rule("nickname.length() >= 3 THEN \"has nickname\"", "tag")
        .build()
        .unwrap();
    let facts = facts_from_json(r#"{"name": "alice"}"#).unwrap();
    let output = ruleset.execute(&facts).unwrap();
    assert!(output.is_empty());
}

#[test]
fn null_transformation_result_is_present_with_null() {
    let ruleset = RulesetBuilder::new("r")
        .rule("true THEN nickname.toUpperCase()", "nick_upper")
        .build()
        .unwrap();
    let output = ruleset.execute(&HashMap::new()).unwrap();
    // The rule fired, so the key exists even though its value is null.
    assert_eq!(output["nick_upper"], Value::Null);
}

#[test]
fn null_transformation_fails_strict() {
    let ruleset = RulesetBuilder::new("r")
        .rule("true THEN nickname.toUpperCase()", "nick_upper")
        .build()
        .unwrap();
    let err = ruleset
        .execute_with(&HashMap::new(), &ExecutionOptions::strict())
        .unwrap_err();
    assert_eq!(
        err.source,
        EvalError::NullPropertyAccess {
            target: "toUpperCase".to_owned()
        }
    );
}

#[test]
fn condition_evaluating_to_null_is_treated_as_false() {
    // The path resolves to an actual null fact; same policy as a missing key.
    let ruleset = RulesetBuilder::new("r")
        .rule("flag THEN \"on\"", "state")
        .build()
        .unwrap();
    let facts = facts_from_json(r#"{"flag": null}"#).unwrap();
    let output = ruleset.execute(&facts).unwrap();
    assert!(output.is_empty());

    let err = ruleset
        .execute_with(&facts, &ExecutionOptions::strict())
        .unwrap_err();
    assert!(err.source.is_null_property_access());
}

#[test]
fn non_boolean_condition_is_fatal_even_when_null_safe() {
    let ruleset = RulesetBuilder::new("r")
        .rule("name THEN \"x\"", "out")
        .build()
        .unwrap();
    let facts = facts_from_json(r#"{"name": "alice"}"#).unwrap();
    let err = ruleset.execute(&facts).unwrap_err();
    assert_eq!(
        err.source,
        EvalError::TypeMismatch {
            context: "condition".to_owned(),
            expected: "boolean".to_owned(),
            actual: "string".to_owned(),
        }
    );
}

#[test]
fn unknown_function_is_fatal_even_when_null_safe() {
    let ruleset = RulesetBuilder::new("r")
        .rule("true THEN SHOUT(name)", "out")
        .build()
        .unwrap();
    let err = ruleset.execute(&HashMap::new()).unwrap_err();
    assert!(matches!(err.source, EvalError::UnknownFunction { .. }));
}

#[test]
fn arity_mismatch_is_fatal_even_when_null_safe() {
    let ruleset = RulesetBuilder::new("r")
        .rule("true THEN SUBSTRING(name)", "out")
        .build()
        .unwrap();
    let facts = facts_from_json(r#"{"name": "alice"}"#).unwrap();
    let err = ruleset.execute(&facts).unwrap_err();
    assert!(matches!(err.source, EvalError::ArityMismatch { .. }));
}

#[test]
fn error_message_names_the_rule() {
    let ruleset = RulesetBuilder::new("r")
        .rule("true THEN SHOUT(name)", "out")
        .build()
        .unwrap();
    let err = ruleset.execute(&HashMap::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("rule 'out' failed"));
    assert!(message.contains("unknown function 'SHOUT'"));
    assert!(message.contains("SHOUT(name)"));
}
