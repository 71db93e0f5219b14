//! Infix to postfix conversion (shunting-yard).

use core::fmt;

use crate::error::EvalError;
use crate::lexer::Token;
use crate::operator::Operator;

/// One entry of a postfix sequence. Parentheses never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    Operand(String),
    Operator(Operator),
}

/// An expression in Reverse Polish order, e.g. `1 2 3 * +`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix {
    items: Vec<PostfixItem>,
}

impl Postfix {
    pub fn items(&self) -> &[PostfixItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            match item {
                PostfixItem::Operand(text) => f.write_str(text)?,
                PostfixItem::Operator(op) => write!(f, "{op}")?,
            }
        }
        Ok(())
    }
}

/// Entries of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    Operator(Operator),
    LeftParen,
}

/// Convert an infix token sequence into postfix order.
///
/// Operators of equal precedence are popped before the incoming one is
/// pushed, which makes every operator left-associative.
pub fn to_postfix<I>(tokens: I) -> Result<Postfix, EvalError>
where
    I: IntoIterator<Item = Token>,
{
    let mut output = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(text) => output.push(PostfixItem::Operand(text)),
            Token::LeftParen => stack.push(StackEntry::LeftParen),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(StackEntry::Operator(op)) => output.push(PostfixItem::Operator(op)),
                    Some(StackEntry::LeftParen) => break,
                    None => return Err(EvalError::MismatchedParentheses),
                }
            },
            Token::Operator(incoming) => {
                while let Some(&StackEntry::Operator(top)) = stack.last() {
                    if top.precedence() < incoming.precedence() {
                        break;
                    }
                    stack.pop();
                    output.push(PostfixItem::Operator(top));
                }
                stack.push(StackEntry::Operator(incoming));
            }
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackEntry::LeftParen => return Err(EvalError::MismatchedParentheses),
        }
    }

    let postfix = Postfix { items: output };
    log::debug!("postfix: {postfix}");
    Ok(postfix)
}
