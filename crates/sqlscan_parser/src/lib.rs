//! Lexer and state machine parsers for a small subset of SQL.
//!
//! Two grammars are supported: `SELECT <columns> FROM <tables>` queries and
//! `CREATE TABLE` definitions.
pub mod ast;
pub mod error;
pub mod grammar;
pub mod iter;
pub mod keywords;
pub mod parser;
pub mod tokens;

use ast::{CreateTable, Query};
use parser::Parsed;

/// Parse a single SELECT statement.
///
/// The returned value may be partially populated if an error occurred, in
/// which case it should only be used for diagnostics.
pub fn parse_query(sql: &str) -> Parsed<Query> {
    grammar::query::parse(sql)
}

/// Parse a single CREATE TABLE statement.
///
/// Same partial result semantics as `parse_query`.
pub fn parse_create_table(sql: &str) -> Parsed<CreateTable> {
    grammar::create_table::parse(sql)
}
