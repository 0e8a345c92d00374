mod context;
mod error;
mod expr;
mod path;
mod rule;
mod ruleset;
mod value;

pub use error::{DefinitionError, EvalError, ExecutionError};
pub use expr::{CompareOp, Expr};
pub use path::{Path, Segment};
pub use rule::Rule;
pub use ruleset::{Ruleset, RulesetBuilder};
pub use value::{facts_from_json, Value};

pub(crate) use context::ExecutionContext;
