use tracing::debug;

use super::{expected, unexpected};
use crate::ast::{CreateTable, TableColumn};
use crate::error::{ParseError, Result};
use crate::keywords::Keyword;
use crate::parser::{Parsed, Parser, StateFn, Transition};
use crate::tokens::{Token, TokenKind};

pub fn parse(sql: &str) -> Parsed<CreateTable> {
    let parsed = Parser::new(sql).run(StateFn(create_start));
    debug!(ok = parsed.is_ok(), "parsed create table");
    parsed
}

fn add_comment(p: &mut Parser<CreateTable>, comment: String) -> Result<()> {
    p.commit(comment, "comment", |t, c| t.comments.push(c))
}

fn add_column(p: &mut Parser<CreateTable>, column: TableColumn) -> Result<()> {
    p.commit(column, "table column", |t, col| t.columns.push(col))
}

fn unsupported_keyword(tok: Token) -> ParseError {
    ParseError::UnsupportedKeyword {
        keyword: tok.text,
        line: tok.line,
    }
}

/// Leading comments, then CREATE.
fn create_start(p: &mut Parser<CreateTable>) -> Result<Transition<CreateTable>> {
    let tok = p.next()?;
    match tok.kind {
        kind if kind.is_comment() => {
            add_comment(p, tok.text)?;
            Ok(Some(StateFn(create_start)))
        }
        TokenKind::Keyword if tok.is_keyword(Keyword::CREATE) => {
            Ok(Some(StateFn(create_object)))
        }
        TokenKind::Keyword => Ok(p.fail(unsupported_keyword(tok))),
        _ => Ok(p.fail(unexpected("create", tok))),
    }
}

/// TABLE, possibly preceded by more comments.
fn create_object(p: &mut Parser<CreateTable>) -> Result<Transition<CreateTable>> {
    let tok = p.next()?;
    match tok.kind {
        kind if kind.is_comment() => {
            add_comment(p, tok.text)?;
            Ok(Some(StateFn(create_object)))
        }
        TokenKind::Keyword if tok.is_keyword(Keyword::TABLE) => Ok(Some(StateFn(table_name))),
        TokenKind::Keyword => Ok(p.fail(unsupported_keyword(tok))),
        _ => Ok(p.fail(unexpected("create", tok))),
    }
}

/// `<name> (`
fn table_name(p: &mut Parser<CreateTable>) -> Result<Transition<CreateTable>> {
    let tok = p.next()?;
    match tok.kind {
        TokenKind::Identifier | TokenKind::BacktickedIdentifier => p.result.name = tok.text,
        _ => return Ok(p.fail(expected("table name", &tok))),
    }

    let tok = p.next()?;
    if tok.kind != TokenKind::LeftParen {
        return Ok(p.fail(expected("'(' after table name", &tok)));
    }

    Ok(Some(StateFn(table_columns)))
}

/// Build one column definition at a time until the closing paren.
fn table_columns(p: &mut Parser<CreateTable>) -> Result<Transition<CreateTable>> {
    let mut col = TableColumn::default();
    loop {
        let tok = p.next()?;
        match tok.kind {
            TokenKind::Keyword => match tok.keyword() {
                Some(Keyword::NOT) => {
                    if !p.peek()?.is_keyword(Keyword::NULL) {
                        let found = p.next()?;
                        let err = expected(
                            format!("NULL after NOT for column '{}'", col.name),
                            &found,
                        );
                        return Ok(p.fail(err));
                    }
                    col.not_null = true;
                    p.skip()?;
                }
                Some(Keyword::PRIMARY) => {
                    let is_key = {
                        let next = p.peek()?;
                        next.kind == TokenKind::Identifier && next.text.eq_ignore_ascii_case("KEY")
                    };
                    if !is_key {
                        let found = p.next()?;
                        let err = expected(
                            format!("KEY after PRIMARY for column '{}'", col.name),
                            &found,
                        );
                        return Ok(p.fail(err));
                    }
                    // TODO: Store the primary key on the column once CreateTable
                    // carries key constraints.
                    debug!(column = %col.name, "ignoring PRIMARY KEY");
                    p.skip()?;
                }
                Some(Keyword::ARRAY) => array_type(p, &mut col)?,
                _ => return Ok(p.fail(unexpected("columns", tok))),
            },
            TokenKind::Identifier | TokenKind::BacktickedIdentifier => {
                if col.name.is_empty() {
                    col.name = tok.text;
                } else {
                    col.base_type = tok.text.to_ascii_uppercase();
                }
            }
            TokenKind::LeftParen => col.type_size = Some(type_size(p, &col)?),
            TokenKind::Comma => {
                add_column(p, col)?;
                return Ok(Some(StateFn(table_columns)));
            }
            TokenKind::RightParen => {
                add_column(p, col)?;
                return Ok(None);
            }
            _ => return Ok(p.fail(unexpected("columns", tok))),
        }
    }
}

/// `<size>)` following an opening paren, e.g. `MAX)` or `10)`.
fn type_size(p: &mut Parser<CreateTable>, col: &TableColumn) -> Result<String> {
    let size = p.next()?;
    if !matches!(size.kind, TokenKind::Identifier | TokenKind::Number) {
        return Err(expected(format!("type size for column '{}'", col.name), &size));
    }

    let close = p.next()?;
    if close.kind != TokenKind::RightParen {
        return Err(expected(
            format!("')' after type size for column '{}'", col.name),
            &close,
        ));
    }

    Ok(size.text.to_ascii_uppercase())
}

/// `<<type>[(<size>)]>` following ARRAY.
fn array_type(p: &mut Parser<CreateTable>, col: &mut TableColumn) -> Result<()> {
    expect_operator(p, "<", col)?;

    let elem = p.next()?;
    if elem.kind != TokenKind::Identifier {
        return Err(expected(
            format!("array element type for column '{}'", col.name),
            &elem,
        ));
    }
    col.base_type = elem.text.to_ascii_uppercase();
    col.is_array = true;

    if p.peek()?.kind == TokenKind::LeftParen {
        p.skip()?;
        col.type_size = Some(type_size(p, col)?);
    }

    expect_operator(p, ">", col)
}

fn expect_operator(p: &mut Parser<CreateTable>, op: &str, col: &TableColumn) -> Result<()> {
    let tok = p.next()?;
    if tok.kind != TokenKind::Operator || tok.text != op {
        return Err(expected(
            format!("'{op}' in array type for column '{}'", col.name),
            &tok,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnType;

    fn parse_ok(sql: &str) -> CreateTable {
        parse(sql).into_result().unwrap()
    }

    fn column(name: &str, base_type: &str, type_size: Option<&str>, not_null: bool) -> TableColumn {
        TableColumn {
            name: name.to_string(),
            base_type: base_type.to_string(),
            type_size: type_size.map(String::from),
            is_array: false,
            not_null,
        }
    }

    #[test]
    fn users_table() {
        let table = parse_ok(
            "CREATE TABLE users (
    user_id int PRIMARY KEY,
    username STRING(MAX) NOT NULL,
    password STRING(MAX) NOT NULL
);",
        );

        assert_eq!("users", table.name);
        assert_eq!(
            vec![
                column("user_id", "INT", None, false),
                column("username", "STRING", Some("MAX"), true),
                column("password", "STRING", Some("MAX"), true),
            ],
            table.columns
        );
        assert_eq!(Some(ColumnType::String), table.columns[1].column_type());
        assert_eq!(None, table.columns[0].column_type());
    }

    #[test]
    fn numeric_type_size() {
        let table = parse_ok("create table t (name string(10), age int64)");
        assert_eq!(
            vec![
                column("name", "STRING", Some("10"), false),
                column("age", "INT64", None, false),
            ],
            table.columns
        );
    }

    #[test]
    fn array_columns() {
        let table =
            parse_ok("CREATE TABLE t (tags ARRAY<STRING(MAX)> NOT NULL, ids ARRAY<INT64>)");
        assert_eq!(
            vec![
                TableColumn {
                    name: "tags".to_string(),
                    base_type: "STRING".to_string(),
                    type_size: Some("MAX".to_string()),
                    is_array: true,
                    not_null: true,
                },
                TableColumn {
                    name: "ids".to_string(),
                    base_type: "INT64".to_string(),
                    type_size: None,
                    is_array: true,
                    not_null: false,
                },
            ],
            table.columns
        );
    }

    #[test]
    fn comments_before_and_between_keywords() {
        let table = parse_ok("-- users\nCREATE /* really */ TABLE users (id INT64)");
        assert_eq!(vec!["-- users", "/* really */"], table.comments);
        assert_eq!("users", table.name);
    }

    #[test]
    fn not_without_null() {
        let parsed = parse("CREATE TABLE t (id INT64 NOT 5)");
        assert_eq!(
            Some(ParseError::Expected {
                expected: "NULL after NOT for column 'id'".to_string(),
                found: "5".to_string(),
                line: 1,
            }),
            parsed.error
        );
    }

    #[test]
    fn primary_without_key() {
        let parsed = parse("CREATE TABLE t (id INT64 PRIMARY id)");
        assert!(matches!(parsed.error, Some(ParseError::Expected { .. })));
    }

    #[test]
    fn missing_paren_after_name() {
        let parsed = parse("CREATE TABLE t id INT64");
        assert!(matches!(parsed.error, Some(ParseError::Expected { .. })));
        assert_eq!("t", parsed.value.name);
    }

    #[test]
    fn bad_type_size() {
        let parsed = parse("CREATE TABLE t (name STRING(MAX, 1))");
        assert!(matches!(parsed.error, Some(ParseError::Expected { .. })));
    }

    #[test]
    fn unsupported_keywords() {
        let parsed = parse("SELECT * FROM t");
        assert_eq!(
            Some(ParseError::UnsupportedKeyword {
                keyword: "SELECT".to_string(),
                line: 1,
            }),
            parsed.error
        );

        let parsed = parse("CREATE INDEX idx");
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnexpectedToken {
                state: "create",
                kind: TokenKind::Identifier,
                ..
            })
        ));

        let parsed = parse("CREATE SELECT");
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnsupportedKeyword { .. })
        ));
    }

    #[test]
    fn column_missing_type() {
        let parsed = parse("CREATE TABLE t (id)");
        assert_eq!(
            Some(ParseError::InvalidValue {
                what: "table column"
            }),
            parsed.error
        );
    }

    #[test]
    fn unterminated_column_list() {
        let parsed = parse("CREATE TABLE t (id INT64,");
        assert_eq!(
            vec![column("id", "INT64", None, false)],
            parsed.value.columns
        );
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnexpectedToken {
                kind: TokenKind::EndOfInput,
                ..
            })
        ));
    }
}
