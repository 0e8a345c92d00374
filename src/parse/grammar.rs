use winnow::ascii::dec_int;
use winnow::combinator::{alt, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::types::{CompareOp, Expr, Path, Segment, Value};

// -- Whitespace & identifiers -----------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        // EOF before the closing quote is an unterminated string
        let ch = any.parse_next(input).map_err(ErrMode::cut)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input).map_err(ErrMode::cut)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn negative_number(input: &mut &str) -> ModalResult<Value> {
    let neg_str = (
        '-',
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .parse_next(input)?;
    if neg_str.contains('.') {
        let f: f64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn float_literal(input: &mut &str) -> ModalResult<f64> {
    // Only match floats that contain a decimal point
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn number_literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        negative_number,
        float_literal.map(Value::Float),
        dec_int::<_, i64, _>.map(Value::Int),
    ))
    .parse_next(input)
}

// -- Operators --------------------------------------------------------------

fn or_op(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    if opt("||").parse_next(input)?.is_some() {
        return Ok(());
    }
    let start = input.checkpoint();
    match opt(ident).parse_next(input)? {
        Some("OR" | "or") => Ok(()),
        _ => {
            input.reset(&start);
            Err(ErrMode::from_input(input))
        }
    }
}

fn and_op(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    if opt("&&").parse_next(input)?.is_some() {
        return Ok(());
    }
    let start = input.checkpoint();
    match opt(ident).parse_next(input)? {
        Some("AND" | "and") => Ok(()),
        _ => {
            input.reset(&start);
            Err(ErrMode::from_input(input))
        }
    }
}

fn not_op(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    let start = input.checkpoint();
    if opt('!').parse_next(input)?.is_some() {
        // "!=" belongs to the equality level, not unary negation
        if input.starts_with('=') {
            input.reset(&start);
            return Err(ErrMode::from_input(input));
        }
        return Ok(());
    }
    match opt(ident).parse_next(input)? {
        Some("NOT" | "not") => Ok(()),
        _ => {
            input.reset(&start);
            Err(ErrMode::from_input(input))
        }
    }
}

fn eq_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt(("==".value(CompareOp::Eq), "!=".value(CompareOp::Neq))).parse_next(input)
}

fn rel_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt((
        ">=".value(CompareOp::Gte),
        "<=".value(CompareOp::Lte),
        ">".value(CompareOp::Gt),
        "<".value(CompareOp::Lt),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: OR < AND < equality < relational < NOT) -------

pub(super) fn expression(input: &mut &str) -> ModalResult<Expr> {
    let expr = or_expr(input)?;
    ws.parse_next(input)?;
    Ok(expr)
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded(or_op, cut_and_expr)).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn cut_and_expr(input: &mut &str) -> ModalResult<Expr> {
    and_expr(input).map_err(ErrMode::cut)
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = equality(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded(and_op, cut_equality)).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn cut_equality(input: &mut &str) -> ModalResult<Expr> {
    equality(input).map_err(ErrMode::cut)
}

fn equality(input: &mut &str) -> ModalResult<Expr> {
    let first = relational(input)?;
    let rest: Vec<(CompareOp, Expr)> =
        repeat(0.., (eq_op, cut_relational)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, (op, rhs)| Expr::Compare {
        lhs: Box::new(acc),
        op,
        rhs: Box::new(rhs),
    }))
}

fn cut_relational(input: &mut &str) -> ModalResult<Expr> {
    relational(input).map_err(ErrMode::cut)
}

fn relational(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<(CompareOp, Expr)> = repeat(0.., (rel_op, cut_unary)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |acc, (op, rhs)| Expr::Compare {
        lhs: Box::new(acc),
        op,
        rhs: Box::new(rhs),
    }))
}

fn cut_unary(input: &mut &str) -> ModalResult<Expr> {
    unary(input).map_err(ErrMode::cut)
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    let start = input.checkpoint();
    if not_op(input).is_ok() {
        let inner = unary(input).map_err(ErrMode::cut)?;
        return Ok(Expr::Not(Box::new(inner)));
    }
    input.reset(&start);
    postfix(input)
}

// -- Postfix method chains --------------------------------------------------

fn postfix(input: &mut &str) -> ModalResult<Expr> {
    let mut expr = primary(input)?;
    loop {
        let start = input.checkpoint();
        ws.parse_next(input)?;
        if opt('.').parse_next(input)?.is_none() {
            input.reset(&start);
            break;
        }
        let Some(name) = opt(ident).parse_next(input)? else {
            input.reset(&start);
            break;
        };
        ws.parse_next(input)?;
        if opt('(').parse_next(input)?.is_none() {
            input.reset(&start);
            break;
        }
        let args = call_args(input)?;
        expr = Expr::Method {
            receiver: Box::new(expr),
            name: name.to_owned(),
            args,
        };
    }
    Ok(expr)
}

/// Argument list after the opening parenthesis has been consumed.
fn call_args(input: &mut &str) -> ModalResult<Vec<Expr>> {
    ws.parse_next(input)?;
    if opt(')').parse_next(input)?.is_some() {
        return Ok(Vec::new());
    }
    let args: Vec<Expr> = separated(1.., expression, ',').parse_next(input)?;
    ')'.parse_next(input).map_err(ErrMode::cut)?;
    Ok(args)
}

// -- Primary ----------------------------------------------------------------

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((parenthesized, literal_expr, ident_based))
        .context(StrContext::Expected(StrContextValue::Description(
            "expression",
        )))
        .parse_next(input)
}

fn parenthesized(input: &mut &str) -> ModalResult<Expr> {
    '('.parse_next(input)?;
    let expr = expression(input).map_err(ErrMode::cut)?;
    ')'.parse_next(input).map_err(ErrMode::cut)?;
    Ok(expr)
}

fn literal_expr(input: &mut &str) -> ModalResult<Expr> {
    alt((string_literal.map(Value::String), number_literal))
        .map(Expr::Literal)
        .parse_next(input)
}

/// An identifier opens one of: keyword literal, function call, or path.
fn ident_based(input: &mut &str) -> ModalResult<Expr> {
    let name = ident.parse_next(input)?;
    match name {
        "true" => return Ok(Expr::Literal(Value::Bool(true))),
        "false" => return Ok(Expr::Literal(Value::Bool(false))),
        "null" => return Ok(Expr::Literal(Value::Null)),
        _ => {}
    }

    let start = input.checkpoint();
    ws.parse_next(input)?;
    if opt('(').parse_next(input)?.is_some() {
        let args = call_args(input)?;
        return Ok(Expr::Call {
            name: name.to_owned(),
            args,
        });
    }
    input.reset(&start);

    let mut segments = Vec::new();
    loop {
        let seg_start = input.checkpoint();
        if opt('[').parse_next(input)?.is_some() {
            let idx = index_literal(input).map_err(ErrMode::cut)?;
            ']'.parse_next(input).map_err(ErrMode::cut)?;
            segments.push(Segment::Index(idx));
            continue;
        }
        if opt('.').parse_next(input)?.is_some() {
            let Some(key) = opt(ident).parse_next(input)? else {
                return Err(ErrMode::from_input(input).cut());
            };
            let after_key = input.checkpoint();
            ws.parse_next(input)?;
            if input.starts_with('(') {
                // a method call; hand ".name(" back to the postfix level
                input.reset(&seg_start);
                break;
            }
            input.reset(&after_key);
            segments.push(Segment::Key(key.to_owned()));
            continue;
        }
        break;
    }

    Ok(Expr::Path(Path {
        root: name.to_owned(),
        segments,
    }))
}

fn index_literal(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(str::parse::<usize>)
        .context(StrContext::Expected(StrContextValue::Description(
            "list index",
        )))
        .parse_next(input)
}
