use thiserror::Error;

/// Failure kinds shared by every stage of the pipeline.
///
/// Each evaluation produces at most one of these; the first failure
/// found is returned unchanged to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("invalid expression")]
    InvalidExpression,
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    #[error("division by zero")]
    DivisionByZero,
    /// A stage invariant was violated. Never produced for any input the
    /// other kinds already cover.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EvalError {
    /// True for the kinds caused by malformed input text.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            EvalError::InvalidExpression | EvalError::MismatchedParentheses
        )
    }
}
