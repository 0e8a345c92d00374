use thiserror::Error;

use crate::parse::ParseError;
use crate::types::{DefinitionError, ExecutionError};

/// Top-level error type unifying everything this crate can fail with.
///
/// Most APIs return their specific error kind; this enum exists for callers
/// who load, build, and execute in one `?`-chained flow.
#[derive(Debug, Error)]
pub enum RuleflowError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
