use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::keywords::{Keyword, keyword_from_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Lexing failed, the token text holds the error message.
    Error,
    EndOfInput,
    /// `-- ...` up to (not including) the end of the line.
    SingleLineComment,
    /// `/* ... */`
    MultiLineComment,
    Keyword,
    Identifier,
    /// `` `users` ``, backticks included in the text.
    BacktickedIdentifier,
    /// A run of one or more operator characters, e.g. `=`, `<>`, `*`.
    Operator,
    LeftParen,
    RightParen,
    Comma,
    Dot,
    /// `;`
    StatementEnd,
    Number,
    /// Single or double quoted string, quotes included in the text.
    String,
}

impl TokenKind {
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            TokenKind::SingleLineComment | TokenKind::MultiLineComment
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::EndOfInput => "end of input",
            Self::SingleLineComment => "single-line comment",
            Self::MultiLineComment => "multi-line comment",
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::BacktickedIdentifier => "backticked identifier",
            Self::Operator => "operator",
            Self::LeftParen => "left paren",
            Self::RightParen => "right paren",
            Self::Comma => "comma",
            Self::Dot => "dot",
            Self::StatementEnd => "statement end",
            Self::Number => "number",
            Self::String => "string",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text of the token as it appeared in the input. For `Error` tokens
    /// this is the error message.
    pub text: String,
    /// Line the lexer was on when the token was emitted, starting at 1.
    pub line: usize,
}

impl Token {
    /// Get the keyword for this token, if it's a keyword token.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword => keyword_from_str(&self.text),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    pub fn is_one_of_keywords(&self, keywords: &[Keyword]) -> bool {
        match self.keyword() {
            Some(kw) => keywords.contains(&kw),
            None => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "EOF"),
            TokenKind::Error => write!(f, "{}", self.text),
            _ if self.text.chars().count() > 10 => {
                let short: String = self.text.chars().take(10).collect();
                write!(f, "{short:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

const SINGLE_LINE_COMMENT_START: &str = "--";
const MULTI_LINE_COMMENT_START: &str = "/*";
const MULTI_LINE_COMMENT_END: &str = "*/";

const OPERATORS: &str = "+-*/=><~|^&%";
const DECIMAL_DIGITS: &str = "0123456789";
const HEX_DIGITS: &str = "0123456789abcdefABCDEF";

/// A single step of the lexer state machine.
///
/// Each step may emit zero or more tokens and returns the next step to run,
/// or `None` once a terminal token has been emitted.
#[derive(Clone, Copy)]
struct LexState(fn(&mut Lexer<'_>) -> Option<LexState>);

/// Converts SQL text into tokens.
///
/// Tokens can be pulled one at a time through the `Iterator` implementation,
/// or collected all at once with `tokenize`. Either way the stream always ends
/// with exactly one `EndOfInput` or `Error` token.
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the start of the pending token.
    start: usize,
    /// Byte offset of the next char to read.
    pos: usize,
    line: usize,
    state: Option<LexState>,
    pending: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            start: 0,
            pos: 0,
            line: 1,
            state: Some(LexState(lex_whitespace)),
            pending: VecDeque::new(),
        }
    }

    /// Scan the entire input.
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn pending_text(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skip over `n` chars known to be present.
    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.next_char();
        }
    }

    /// Consume the next char if it's in the valid set.
    fn accept(&mut self, valid: &str) -> bool {
        match self.peek_char() {
            Some(c) if valid.contains(c) => {
                self.next_char();
                true
            }
            _ => false,
        }
    }

    /// Consume a run of chars from the valid set.
    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    /// Drop the pending input.
    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn emit(&mut self, kind: TokenKind) {
        let text = self.pending_text().to_string();
        trace!(%kind, %text, line = self.line, "emit token");
        self.pending.push_back(Token {
            kind,
            text,
            line: self.line,
        });
        self.start = self.pos;
    }

    /// Emit an error token and halt the scan.
    fn error(&mut self, message: String) -> Option<LexState> {
        trace!(%message, line = self.line, "emit error token");
        self.pending.push_back(Token {
            kind: TokenKind::Error,
            text: message,
            line: self.line,
        });
        None
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Some(tok);
            }
            let state = self.state.take()?;
            self.state = (state.0)(self);
        }
    }
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || is_newline(c)
}

fn is_newline(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Letters, digits, and underscore.
fn is_alphanumeric(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_operator(c: char) -> bool {
    OPERATORS.contains(c)
}

fn lex_whitespace(l: &mut Lexer<'_>) -> Option<LexState> {
    loop {
        if l.remaining().starts_with(SINGLE_LINE_COMMENT_START) {
            return Some(LexState(lex_single_line_comment));
        }
        if l.remaining().starts_with(MULTI_LINE_COMMENT_START) {
            return Some(LexState(lex_multi_line_comment));
        }

        let c = match l.peek_char() {
            Some(c) => c,
            None => {
                l.emit(TokenKind::EndOfInput);
                return None;
            }
        };

        let kind = match c {
            c if is_whitespace(c) => {
                l.next_char();
                l.ignore();
                continue;
            }
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::StatementEnd,
            '.' => TokenKind::Dot,
            '`' => return Some(LexState(lex_backticked_identifier)),
            '"' | '\'' => return Some(LexState(lex_string)),
            c if is_operator(c) => return Some(LexState(lex_operator)),
            c if c.is_ascii_digit() => return Some(LexState(lex_number)),
            c if is_alphanumeric(c) => return Some(LexState(lex_identifier_or_keyword)),
            other => {
                l.next_char();
                return l.error(format!("unrecognized character: {other:?}"));
            }
        };

        l.next_char();
        l.emit(kind);
        return Some(LexState(lex_whitespace));
    }
}

fn lex_single_line_comment(l: &mut Lexer<'_>) -> Option<LexState> {
    l.advance(SINGLE_LINE_COMMENT_START.len());
    while let Some(c) = l.peek_char() {
        if is_newline(c) {
            break;
        }
        l.next_char();
    }
    l.emit(TokenKind::SingleLineComment);
    Some(LexState(lex_whitespace))
}

fn lex_multi_line_comment(l: &mut Lexer<'_>) -> Option<LexState> {
    l.advance(MULTI_LINE_COMMENT_START.len());
    loop {
        if l.remaining().starts_with(MULTI_LINE_COMMENT_END) {
            l.advance(MULTI_LINE_COMMENT_END.len());
            l.emit(TokenKind::MultiLineComment);
            return Some(LexState(lex_whitespace));
        }
        if l.next_char().is_none() {
            return l.error("eof found in middle of multi-line comment".to_string());
        }
    }
}

fn lex_operator(l: &mut Lexer<'_>) -> Option<LexState> {
    l.accept_run(OPERATORS);
    l.emit(TokenKind::Operator);
    Some(LexState(lex_whitespace))
}

fn lex_string(l: &mut Lexer<'_>) -> Option<LexState> {
    let quote = l.next_char()?;
    loop {
        match l.peek_char() {
            None => return l.error("unterminated quoted string".to_string()),
            Some(c) if is_newline(c) => return l.error("unterminated quoted string".to_string()),
            Some('\\') => {
                l.next_char();
                // Escaped char is taken as-is, it just can't end the line.
                match l.peek_char() {
                    Some(c) if !is_newline(c) => {
                        l.next_char();
                    }
                    _ => return l.error("unterminated quoted string".to_string()),
                }
            }
            Some(c) => {
                l.next_char();
                if c == quote {
                    l.emit(TokenKind::String);
                    return Some(LexState(lex_whitespace));
                }
            }
        }
    }
}

/// Unsigned number. A leading sign is lexed as an operator.
fn lex_number(l: &mut Lexer<'_>) -> Option<LexState> {
    let mut digits = DECIMAL_DIGITS;
    if l.accept("0") && l.accept("xX") {
        digits = HEX_DIGITS;
    }
    l.accept_run(digits);
    if l.accept(".") {
        l.accept_run(digits);
    }
    if l.accept("eE") {
        l.accept("+-");
        l.accept_run(DECIMAL_DIGITS);
    }

    if l.peek_char().is_some_and(is_alphanumeric) {
        l.next_char();
        let text = l.pending_text();
        return l.error(format!("bad number syntax: {text:?}"));
    }

    l.emit(TokenKind::Number);
    Some(LexState(lex_whitespace))
}

fn lex_identifier_or_keyword(l: &mut Lexer<'_>) -> Option<LexState> {
    loop {
        match l.peek_char() {
            Some(c) if is_alphanumeric(c) => {
                l.next_char();
            }
            Some('.') => {
                // Part before a dot is always a name (`schema.table`,
                // `table.column`), never a keyword.
                if l.start < l.pos {
                    l.emit(TokenKind::Identifier);
                }
                l.next_char();
                l.emit(TokenKind::Dot);
            }
            _ => {
                let word = l.pending_text();
                if !word.is_empty() {
                    match keyword_from_str(word) {
                        Some(_) => l.emit(TokenKind::Keyword),
                        None => l.emit(TokenKind::Identifier),
                    }
                }
                return Some(LexState(lex_whitespace));
            }
        }
    }
}

fn lex_backticked_identifier(l: &mut Lexer<'_>) -> Option<LexState> {
    l.next_char();
    loop {
        match l.peek_char() {
            Some(c) if is_alphanumeric(c) => {
                l.next_char();
            }
            Some('`') => {
                l.next_char();
                l.emit(TokenKind::BacktickedIdentifier);
                return Some(LexState(lex_whitespace));
            }
            _ => return l.error("unterminated backtick".to_string()),
        }
    }
}
