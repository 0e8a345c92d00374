//! A built ruleset is immutable and can serve concurrent executions from
//! behind an `Arc`, each run with its own facts and its own context.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use ruleflow::{RulesetBuilder, Value};

#[test]
fn shared_ruleset_across_threads() {
    let ruleset = Arc::new(
        RulesetBuilder::new("shared")
            .rule("age >= 18 THEN UPPERCASE(name)", "name_upper")
            .rule("age >= 21 THEN CONCAT(\"Mr. \", name_upper)", "formal")
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ruleset = Arc::clone(&ruleset);
            thread::spawn(move || {
                let mut facts = HashMap::new();
                facts.insert("name".to_owned(), Value::from(format!("user{i}")));
                facts.insert("age".to_owned(), Value::Int(18 + i));
                let output = ruleset.execute(&facts).unwrap();
                assert_eq!(output["name_upper"], Value::from(format!("USER{i}")));
                if i >= 3 {
                    assert_eq!(output["formal"], Value::from(format!("Mr. USER{i}")));
                } else {
                    assert!(!output.contains_key("formal"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
