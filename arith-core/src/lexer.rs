//! Lazy tokenizer for validated expression text.
//!
//! The tokenizer does not check that numeric literals are well formed.
//! Any run of characters that are not operators, parentheses or spaces
//! becomes a `Number` token; `1.2.3` and `.` are only rejected when the
//! evaluator parses them.

use core::fmt;
use core::iter::FusedIterator;
use core::str::Chars;

use crate::operator::Operator;

/// A single token. Number literals keep their original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    /// Classify a single-character token. Returns `None` for characters
    /// that belong to a numeric literal.
    fn from_punct(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => Operator::from_char(ch).map(Token::Operator),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) => f.write_str(text),
            Token::Operator(op) => write!(f, "{op}"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// Scan `source` into tokens on demand.
///
/// Each call starts a fresh scan, so the same text can be tokenized any
/// number of times.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        chars: source.chars(),
        pending: None,
    }
}

/// Iterator returned by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'src> {
    chars: Chars<'src>,
    /// Punctuation that closed a literal, emitted on the next call.
    pending: Option<Token>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        let mut literal = String::new();
        for ch in self.chars.by_ref() {
            if ch == ' ' {
                // Spaces never close a literal: "1 2" scans as "12".
                continue;
            }
            match Token::from_punct(ch) {
                Some(token) if literal.is_empty() => return Some(token),
                Some(token) => {
                    self.pending = Some(token);
                    return Some(Token::Number(literal));
                }
                None => literal.push(ch),
            }
        }

        if literal.is_empty() {
            None
        } else {
            Some(Token::Number(literal))
        }
    }
}

impl FusedIterator for Tokens<'_> {}
