use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::iter::Cursor;
use crate::tokens::{Lexer, Token, TokenKind};

/// A single step of a grammar.
///
/// Returns the next step to run, or `None` when the grammar is done (either
/// successfully, or because an error was recorded).
pub struct StateFn<V>(pub fn(&mut Parser<V>) -> Result<Transition<V>>);

impl<V> Clone for StateFn<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for StateFn<V> {}

pub type Transition<V> = Option<StateFn<V>>;

/// Optional validity check run before a value is committed into a parse
/// result.
///
/// Types with no rules can use the default, which accepts everything.
pub trait Validate {
    fn is_valid(&self) -> bool {
        true
    }
}

impl Validate for String {}

/// Output of a parse.
///
/// If `error` is set, `value` may be partially populated and should only be
/// used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<V> {
    pub value: V,
    pub error: Option<ParseError>,
}

impl<V> Parsed<V> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Discard the partial value if there was an error.
    pub fn into_result(self) -> Result<V> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// State machine driver shared by all grammars, parameterized by the type
/// being built.
#[derive(Debug)]
pub struct Parser<V> {
    /// The value being built.
    pub result: V,
    tokens: Cursor<Token>,
    error: Option<ParseError>,
}

impl<V: Default> Parser<V> {
    /// Create a parser over the tokens of `sql`.
    ///
    /// The entire input is tokenized up front.
    pub fn new(sql: &str) -> Self {
        Self::with_tokens(Lexer::new(sql).tokenize())
    }

    pub fn with_tokens(tokens: Vec<Token>) -> Self {
        Parser {
            result: V::default(),
            tokens: Cursor::new(tokens),
            error: None,
        }
    }
}

impl<V> Parser<V> {
    /// Run the state machine from `start` until a state returns `None` or an
    /// error is recorded.
    pub fn run(mut self, start: StateFn<V>) -> Parsed<V> {
        let mut state = start;
        loop {
            trace!(consumed = self.tokens.consumed(), "running parser state");
            match (state.0)(&mut self) {
                Ok(Some(next)) if !self.has_error() => state = next,
                Ok(_) => break,
                Err(err) => {
                    self.fail(err);
                    break;
                }
            }
        }
        self.finish()
    }

    /// Consume the next token.
    ///
    /// Errors if there are no tokens left, or if the next token is a lexer
    /// error.
    pub fn next(&mut self) -> Result<Token> {
        match self.tokens.next() {
            Some(tok) if tok.kind == TokenKind::Error => Err(ParseError::Lex {
                line: tok.line,
                message: tok.text,
            }),
            Some(tok) => Ok(tok),
            None => Err(ParseError::NoToken),
        }
    }

    /// Look at the next token without consuming it.
    ///
    /// Same error conditions as `next`.
    pub fn peek(&mut self) -> Result<&Token> {
        match self.tokens.peek() {
            Some(tok) if tok.kind == TokenKind::Error => Err(ParseError::Lex {
                line: tok.line,
                message: tok.text.clone(),
            }),
            Some(tok) => Ok(tok),
            None => Err(ParseError::NoToken),
        }
    }

    /// Consume the next token and discard it.
    pub fn skip(&mut self) -> Result<()> {
        self.next()?;
        Ok(())
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Record an error, joining it with any previously recorded errors.
    ///
    /// Returns the terminal transition so states can `return Ok(p.fail(..))`.
    pub fn fail(&mut self, err: ParseError) -> Transition<V> {
        debug!(%err, "recording parse error");
        self.error = Some(match self.error.take() {
            Some(existing) => existing.join(err),
            None => err,
        });
        None
    }

    /// Push `value` into the result if it passes validation.
    pub fn commit<T, F>(&mut self, value: T, what: &'static str, push: F) -> Result<()>
    where
        T: Validate,
        F: FnOnce(&mut V, T),
    {
        if !value.is_valid() {
            return Err(ParseError::InvalidValue { what });
        }
        push(&mut self.result, value);
        Ok(())
    }

    /// Take the result and any recorded errors.
    pub fn finish(self) -> Parsed<V> {
        Parsed {
            value: self.result,
            error: self.error,
        }
    }
}
