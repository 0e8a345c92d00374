use std::collections::HashMap;

use super::path::{Path, Segment};
use super::value::Value;

/// Two-layer evaluation context: caller-supplied read-only facts, plus the
/// derived variables written by rules that have already fired in this run.
///
/// Created fresh per execution and discarded at the end; never shared
/// between concurrent executions.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    facts: &'a HashMap<String, Value>,
    derived: HashMap<String, Value>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(facts: &'a HashMap<String, Value>) -> Self {
        Self {
            facts,
            derived: HashMap::new(),
        }
    }

    /// Resolve a path against the context.
    ///
    /// The layer is chosen at the root only: if the root name exists in
    /// `derived` the entire chain resolves there, otherwise the entire chain
    /// resolves in `facts`. The two layers are never interleaved mid-path.
    /// Any segment that cannot be resolved (missing key, key lookup on a
    /// non-map, index on a non-list, index out of bounds) short-circuits to
    /// `None`; the caller decides what an unresolved path means.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> Option<&Value> {
        let root = if self.derived.contains_key(&path.root) {
            self.derived.get(&path.root)
        } else {
            self.facts.get(&path.root)
        }?;

        path.segments.iter().try_fold(root, |current, segment| {
            match (segment, current) {
                (Segment::Key(key), Value::Map(entries)) => entries.get(key),
                (Segment::Index(idx), Value::List(items)) => items.get(*idx),
                _ => None,
            }
        })
    }

    /// Record a rule's output, making it visible to subsequent rules.
    /// A later rule writing the same name overwrites the earlier value.
    pub fn set_output(&mut self, name: &str, value: Value) {
        self.derived.insert(name.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(root: &str, segments: Vec<Segment>) -> Path {
        Path {
            root: root.to_owned(),
            segments,
        }
    }

    fn key(name: &str) -> Segment {
        Segment::Key(name.to_owned())
    }

    fn nested_facts() -> HashMap<String, Value> {
        let mut profile = HashMap::new();
        profile.insert("name".to_owned(), Value::String("bob".to_owned()));
        profile.insert("age".to_owned(), Value::Int(30));

        let mut user = HashMap::new();
        user.insert("profile".to_owned(), Value::Map(profile.clone()));

        let mut facts = HashMap::new();
        facts.insert("user".to_owned(), Value::Map(user));
        facts.insert(
            "users".to_owned(),
            Value::List(vec![Value::Map(profile), Value::Int(7)]),
        );
        facts.insert("age".to_owned(), Value::Int(25));
        facts
    }

    #[test]
    fn resolve_bare_root() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        assert_eq!(ctx.resolve(&Path::root("age")), Some(&Value::Int(25)));
        assert_eq!(ctx.resolve(&Path::root("missing")), None);
    }

    #[test]
    fn resolve_nested_keys() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        let p = path("user", vec![key("profile"), key("name")]);
        assert_eq!(ctx.resolve(&p), Some(&Value::String("bob".to_owned())));
    }

    #[test]
    fn resolve_list_index() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        let p = path("users", vec![Segment::Index(0), key("age")]);
        assert_eq!(ctx.resolve(&p), Some(&Value::Int(30)));
    }

    #[test]
    fn index_out_of_bounds_is_none() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        let p = path("users", vec![Segment::Index(5), key("age")]);
        assert_eq!(ctx.resolve(&p), None);
    }

    #[test]
    fn index_on_non_list_is_none() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        let p = path("age", vec![Segment::Index(0)]);
        assert_eq!(ctx.resolve(&p), None);
    }

    #[test]
    fn key_on_non_map_is_none() {
        let facts = nested_facts();
        let ctx = ExecutionContext::new(&facts);
        let p = path("age", vec![key("anything")]);
        assert_eq!(ctx.resolve(&p), None);
        // users[1] is an Int, not a map
        let p = path("users", vec![Segment::Index(1), key("age")]);
        assert_eq!(ctx.resolve(&p), None);
    }

    #[test]
    fn derived_shadows_facts() {
        let mut facts = HashMap::new();
        facts.insert("name".to_owned(), Value::String("alice".to_owned()));
        let mut ctx = ExecutionContext::new(&facts);
        ctx.set_output("name", Value::String("ALICE".to_owned()));
        assert_eq!(
            ctx.resolve(&Path::root("name")),
            Some(&Value::String("ALICE".to_owned()))
        );
    }

    #[test]
    fn shadowing_is_root_level_only() {
        // Once the root is found in derived, missing sub-keys do not fall
        // back to the facts layer.
        let mut profile = HashMap::new();
        profile.insert("city".to_owned(), Value::String("NYC".to_owned()));
        let mut facts = HashMap::new();
        facts.insert("user".to_owned(), Value::Map(profile));

        let mut ctx = ExecutionContext::new(&facts);
        ctx.set_output("user", Value::String("opaque".to_owned()));

        let p = path("user", vec![key("city")]);
        assert_eq!(ctx.resolve(&p), None);
    }

    #[test]
    fn overwrite_keeps_last_value() {
        let facts = HashMap::new();
        let mut ctx = ExecutionContext::new(&facts);
        ctx.set_output("x", Value::Int(1));
        ctx.set_output("x", Value::Int(2));
        assert_eq!(ctx.resolve(&Path::root("x")), Some(&Value::Int(2)));
    }
}
