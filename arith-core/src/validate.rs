//! Character-class filter applied before tokenization.
//!
//! This is not a structural check: `((` or `1+` pass here and are
//! rejected by the later stages.

use crate::error::EvalError;

/// Reject blank input and input containing characters outside the
/// permitted alphabet (digits, `.`, `+ - * /`, parentheses, space).
pub fn validate(text: &str) -> Result<(), EvalError> {
    if text.trim().is_empty() {
        return Err(EvalError::InvalidExpression);
    }
    if let Some((position, ch)) = text.char_indices().find(|&(_, ch)| !is_allowed(ch)) {
        log::debug!("rejected character {ch:?} at byte {position}");
        return Err(EvalError::InvalidExpression);
    }
    Ok(())
}

fn is_allowed(ch: char) -> bool {
    matches!(ch, '0'..='9' | '.' | '+' | '-' | '*' | '/' | '(' | ')' | ' ')
}
