use std::fmt;

use crate::tokens::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Lex { line: usize, message: String },

    #[error("no token found when one was expected")]
    NoToken,

    #[error("line {line}: unsupported token {kind} '{text}' found within {state}")]
    UnexpectedToken {
        state: &'static str,
        kind: TokenKind,
        text: String,
        line: usize,
    },

    #[error("line {line}: unsupported keyword '{keyword}'")]
    UnsupportedKeyword { keyword: String, line: usize },

    #[error("ambiguous identifier '{ident}', table name and alias are already set ({name} {alias})")]
    AmbiguousIdentifier {
        name: String,
        alias: String,
        ident: String,
    },

    #[error("invalid {what}")]
    InvalidValue { what: &'static str },

    #[error("line {line}: expected {expected}, found '{found}'")]
    Expected {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("{}", DisplayJoined(.0))]
    Multiple(Vec<ParseError>),
}

impl ParseError {
    /// Join `other` onto this error.
    ///
    /// Nested `Multiple` errors are flattened so the result is always a single
    /// level deep.
    pub fn join(self, other: ParseError) -> ParseError {
        let mut errors = self.into_vec();
        errors.extend(other.into_vec());
        ParseError::Multiple(errors)
    }

    /// Iterate over the individual errors making up this error.
    pub fn errors(&self) -> &[ParseError] {
        match self {
            ParseError::Multiple(errors) => errors,
            other => std::slice::from_ref(other),
        }
    }

    fn into_vec(self) -> Vec<ParseError> {
        match self {
            ParseError::Multiple(errors) => errors,
            other => vec![other],
        }
    }
}

struct DisplayJoined<'a>(&'a [ParseError]);

impl fmt::Display for DisplayJoined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
