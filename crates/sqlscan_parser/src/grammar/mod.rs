//! State machines for the supported statements.
//!
//! Each grammar is a set of `StateFn`s driven by a `Parser` building one
//! specific result type.
pub mod create_table;
pub mod query;

use crate::error::ParseError;
use crate::tokens::Token;

/// Error for a token that isn't allowed in `state`.
pub(crate) fn unexpected(state: &'static str, tok: Token) -> ParseError {
    ParseError::UnexpectedToken {
        state,
        kind: tok.kind,
        text: tok.text,
        line: tok.line,
    }
}

pub(crate) fn expected(expected: impl Into<String>, found: &Token) -> ParseError {
    ParseError::Expected {
        expected: expected.into(),
        found: found.text.clone(),
        line: found.line,
    }
}
