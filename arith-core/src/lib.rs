//! Core evaluation pipeline for arithmetic expressions.
//!
//! The pipeline is:
//!
//!   expression text
//!     -> validate   (character-class filter)
//!     -> lexer      (lazy token sequence)
//!     -> postfix    (shunting-yard conversion)
//!     -> eval       (value stack)
//!     -> f64
//!
//! Every stage is a pure function of its input. Nothing is cached or
//! shared between calls, so callers may evaluate from as many threads
//! as they like. Front-ends (CLI, HTTP service) should depend on this
//! crate rather than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Front-end: validation and tokenization
// ---------------------------------------------------------------------

pub mod operator;
pub mod validate;
pub mod lexer;

// ---------------------------------------------------------------------
// Back-end: conversion and evaluation
// ---------------------------------------------------------------------

pub mod postfix;
pub mod eval;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use error::EvalError;
pub use eval::evaluate_postfix;
pub use lexer::{Token, Tokens, tokenize};
pub use operator::Operator;
pub use postfix::{Postfix, PostfixItem, to_postfix};
pub use validate::validate;

/// Validate, tokenize and convert `expression` without evaluating it.
pub fn compile(expression: &str) -> Result<Postfix, EvalError> {
    validate(expression)?;
    to_postfix(tokenize(expression))
}

/// Evaluate `expression` to a single value.
///
/// The first failure from any stage is returned unchanged.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let postfix = compile(expression)?;
    let value = evaluate_postfix(&postfix)?;
    log::debug!("{expression:?} = {value}");
    Ok(value)
}
