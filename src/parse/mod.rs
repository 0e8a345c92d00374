//! Expression text to [`Expr`] tree.
//!
//! The grammar lives in [`grammar`]; this module exposes the single
//! entry point and converts winnow's internal error into [`ParseError`].

mod error;
mod grammar;

use winnow::Parser;

use crate::types::Expr;

pub use error::ParseError;

/// Parse a complete expression. Trailing input after a valid expression is
/// an error; the whole string must be consumed.
///
/// # Errors
///
/// Returns [`ParseError`] with the byte offset of the failure.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    grammar::expression
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.inner().to_string()))
}
