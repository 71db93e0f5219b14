//! Postfix evaluation over a value stack.

use crate::error::EvalError;
use crate::postfix::{Postfix, PostfixItem};

/// Evaluate a postfix sequence to a single value.
///
/// Operand literals are parsed here; a literal the tokenizer let through
/// but that is not a decimal number (`1.2.3`, `.`) is an
/// `InvalidExpression`. The stack must hold exactly one value at the end.
pub fn evaluate_postfix(postfix: &Postfix) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for item in postfix.items() {
        match item {
            PostfixItem::Operand(text) => stack.push(parse_operand(text)?),
            PostfixItem::Operator(op) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(EvalError::InvalidExpression);
                };
                stack.push(op.apply(lhs, rhs)?);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::InvalidExpression),
    }
}

fn parse_operand(text: &str) -> Result<f64, EvalError> {
    // `f64::from_str` also accepts forms like `inf` or `1e5`; only plain
    // decimal digits with an optional point are operands.
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(EvalError::InvalidExpression);
    }
    text.parse::<f64>().map_err(|_| {
        log::debug!("unparsable literal {text:?}");
        EvalError::InvalidExpression
    })
}
