//! Property tests over arbitrary fact values.

use std::collections::HashMap;

use proptest::prelude::*;

use ruleflow::{RulesetBuilder, Value};

proptest! {
    #[test]
    fn substring_full_range_is_identity(s in ".*") {
        let ruleset = RulesetBuilder::new("p")
            .rule("true THEN SUBSTRING(word, 0, LENGTH(word))", "out")
            .build()
            .unwrap();
        let mut facts = HashMap::new();
        facts.insert("word".to_owned(), Value::from(s.clone()));
        let output = ruleset.execute(&facts).unwrap();
        prop_assert_eq!(&output["out"], &Value::from(s));
    }

    #[test]
    fn uppercase_then_lowercase_is_idempotent(s in "[a-z ]{0,40}") {
        let ruleset = RulesetBuilder::new("p")
            .rule("true THEN LOWERCASE(UPPERCASE(word))", "out")
            .build()
            .unwrap();
        let mut facts = HashMap::new();
        facts.insert("word".to_owned(), Value::from(s.clone()));
        let output = ruleset.execute(&facts).unwrap();
        prop_assert_eq!(&output["out"], &Value::from(s));
    }

    #[test]
    fn execution_is_deterministic(age in -1000i64..1000, name in "[a-zA-Z]{0,20}") {
        let ruleset = RulesetBuilder::new("p")
            .rule("age >= 18 THEN UPPERCASE(name)", "name_upper")
            .rule("age >= 21 THEN CONCAT(\"Mr. \", name_upper)", "formal")
            .build()
            .unwrap();
        let mut facts = HashMap::new();
        facts.insert("age".to_owned(), Value::Int(age));
        facts.insert("name".to_owned(), Value::from(name));
        let first = ruleset.execute(&facts).unwrap();
        let second = ruleset.execute(&facts).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.contains_key("name_upper"), age >= 18);
    }

    #[test]
    fn numeric_comparisons_never_panic(age in any::<i64>(), threshold in any::<i64>()) {
        let ruleset = RulesetBuilder::new("p")
            .rule("age >= threshold THEN \"over\"", "out")
            .build()
            .unwrap();
        let mut facts = HashMap::new();
        facts.insert("age".to_owned(), Value::Int(age));
        facts.insert("threshold".to_owned(), Value::Int(threshold));
        let output = ruleset.execute(&facts).unwrap();
        prop_assert_eq!(output.contains_key("out"), age >= threshold);
    }
}
