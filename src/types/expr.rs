use std::fmt;

use super::path::Path;
use super::value::Value;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Expression syntax tree produced by [`parse`](crate::parse).
///
/// Both rule conditions and transformations are expressions; a condition is
/// simply an expression required to evaluate to a boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (`"text"`, `42`, `3.5`, `true`, `null`).
    Literal(Value),
    /// A property path resolved against the execution context.
    Path(Path),
    /// A comparison between two sub-expressions.
    Compare {
        lhs: Box<Expr>,
        op: CompareOp,
        rhs: Box<Expr>,
    },
    /// Short-circuiting logical AND.
    And(Box<Expr>, Box<Expr>),
    /// Short-circuiting logical OR.
    Or(Box<Expr>, Box<Expr>),
    /// Logical negation.
    Not(Box<Expr>),
    /// A registry function call, e.g. `UPPERCASE(name)`.
    Call { name: String, args: Vec<Expr> },
    /// A built-in method call on a receiver, e.g. `name.toUpperCase()`.
    Method {
        receiver: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Path(path) => write!(f, "{path}"),
            Expr::Compare { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Expr::And(a, b) => write!(f, "({a} AND {b})"),
            Expr::Or(a, b) => write!(f, "({a} OR {b})"),
            Expr::Not(inner) => write!(f, "(NOT {inner})"),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Method {
                receiver,
                name,
                args,
            } => {
                write!(f, "{receiver}.{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
