use tracing::debug;

use super::{expected, unexpected};
use crate::ast::{Column, Query, StatementKind, Table};
use crate::error::{ParseError, Result};
use crate::keywords::Keyword;
use crate::parser::{Parsed, Parser, StateFn, Transition};
use crate::tokens::TokenKind;

/// Keywords starting a join, none of which are supported yet.
const JOIN_KEYWORDS: &[Keyword] = &[
    Keyword::JOIN,
    Keyword::INNER,
    Keyword::OUTER,
    Keyword::LEFT,
    Keyword::RIGHT,
    Keyword::FULL,
];

pub fn parse(sql: &str) -> Parsed<Query> {
    let parsed = Parser::new(sql).run(StateFn(statement_start));
    debug!(ok = parsed.is_ok(), "parsed query");
    parsed
}

fn add_select(p: &mut Parser<Query>, column: Column) -> Result<()> {
    p.commit(column, "select column", |q, col| q.selects.push(col))
}

fn add_from(p: &mut Parser<Query>, table: Table) -> Result<()> {
    p.commit(table, "table in FROM clause", |q, tbl| q.froms.push(tbl))
}

fn statement_start(p: &mut Parser<Query>) -> Result<Transition<Query>> {
    let tok = p.next()?;
    match tok.kind {
        TokenKind::SingleLineComment | TokenKind::MultiLineComment => {
            p.commit(tok.text, "comment", |q, c| q.comments.push(c))?;
            Ok(Some(StateFn(statement_start)))
        }
        TokenKind::Keyword => match tok.keyword() {
            Some(Keyword::SELECT) => {
                p.result.statement = Some(StatementKind::Select);
                Ok(Some(StateFn(select_columns)))
            }
            _ => Ok(p.fail(ParseError::UnsupportedKeyword {
                keyword: tok.text,
                line: tok.line,
            })),
        },
        _ => Ok(p.fail(unexpected("statement", tok))),
    }
}

/// Build one select item at a time until FROM.
fn select_columns(p: &mut Parser<Query>) -> Result<Transition<Query>> {
    let mut col = Column::default();
    loop {
        let tok = p.next()?;
        match tok.kind {
            TokenKind::Comma => {
                add_select(p, col)?;
                return Ok(Some(StateFn(select_columns)));
            }
            TokenKind::Keyword if tok.is_keyword(Keyword::FROM) => {
                add_select(p, col)?;
                return Ok(Some(StateFn(from_tables)));
            }
            TokenKind::Keyword if tok.is_keyword(Keyword::AS) => {
                let alias = p.next()?;
                if alias.kind != TokenKind::Identifier {
                    return Ok(p.fail(expected("identifier after AS", &alias)));
                }
                col.alias = Some(alias.text);
            }
            TokenKind::Identifier | TokenKind::BacktickedIdentifier => {
                let next_kind = p.peek()?.kind;
                match next_kind {
                    TokenKind::Dot => {
                        // `<table>.<column>`
                        col.table = Some(tok.text);
                        p.skip()?;
                    }
                    TokenKind::Identifier => {
                        // `<column> <alias>`
                        col.column = tok.text;
                        col.alias = Some(p.next()?.text);
                    }
                    _ => col.column.push_str(&tok.text),
                }
            }
            TokenKind::Operator if tok.text == Column::WILDCARD => {
                col.column = Column::WILDCARD.to_string();
            }
            _ => return Ok(p.fail(unexpected("columns", tok))),
        }
    }
}

/// Build one table at a time until the end of the statement.
fn from_tables(p: &mut Parser<Query>) -> Result<Transition<Query>> {
    let mut table = Table::default();
    loop {
        let tok = p.next()?;
        match tok.kind {
            TokenKind::Comma => {
                add_from(p, table)?;
                return Ok(Some(StateFn(from_tables)));
            }
            TokenKind::Keyword if tok.is_keyword(Keyword::WHERE) => {
                add_from(p, table)?;
                return Ok(Some(StateFn(where_clause)));
            }
            TokenKind::Keyword if tok.is_one_of_keywords(JOIN_KEYWORDS) => {
                add_from(p, table)?;
                return Ok(Some(StateFn(join_clause)));
            }
            TokenKind::Identifier | TokenKind::BacktickedIdentifier => {
                if let Some(alias) = table.alias {
                    return Ok(p.fail(ParseError::AmbiguousIdentifier {
                        name: table.name,
                        alias,
                        ident: tok.text,
                    }));
                }
                if table.name.is_empty() {
                    table.name = tok.text;
                } else {
                    table.alias = Some(tok.text);
                }
            }
            TokenKind::EndOfInput | TokenKind::StatementEnd => {
                add_from(p, table)?;
                return Ok(None);
            }
            _ => return Ok(p.fail(unexpected("from-clause", tok))),
        }
    }
}

/// WHERE expressions aren't parsed. Nothing past the keyword is consumed.
fn where_clause(_p: &mut Parser<Query>) -> Result<Transition<Query>> {
    debug!("WHERE clause not supported, ignoring remaining tokens");
    Ok(None)
}

/// Joins aren't parsed. Nothing past the join keyword is consumed.
fn join_clause(_p: &mut Parser<Query>) -> Result<Transition<Query>> {
    debug!("JOIN not supported, ignoring remaining tokens");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(sql: &str) -> Query {
        parse(sql).into_result().unwrap()
    }

    fn column(table: Option<&str>, column: &str, alias: Option<&str>) -> Column {
        Column {
            table: table.map(String::from),
            column: column.to_string(),
            alias: alias.map(String::from),
        }
    }

    fn table(name: &str, alias: Option<&str>) -> Table {
        Table {
            name: name.to_string(),
            alias: alias.map(String::from),
        }
    }

    #[test]
    fn select_star() {
        let query = parse_ok("SELECT * FROM users;");
        assert_eq!(
            Query {
                statement: Some(StatementKind::Select),
                comments: Vec::new(),
                selects: vec![column(None, "*", None)],
                froms: vec![table("users", None)],
            },
            query
        );
    }

    #[test]
    fn lowercase_keywords() {
        let query = parse_ok("select id from users");
        assert_eq!(vec![column(None, "id", None)], query.selects);
        assert_eq!(vec![table("users", None)], query.froms);
    }

    #[test]
    fn alias_with_and_without_as() {
        let with_as = parse_ok("SELECT name AS user_name FROM users;");
        let without_as = parse_ok("SELECT name user_name FROM users;");
        assert_eq!(vec![column(None, "name", Some("user_name"))], with_as.selects);
        assert_eq!(with_as, without_as);
    }

    #[test]
    fn qualified_columns() {
        let query = parse_ok("SELECT user.id, user.*, name FROM users;");
        assert_eq!(
            vec![
                column(Some("user"), "id", None),
                column(Some("user"), "*", None),
                column(None, "name", None),
            ],
            query.selects
        );
    }

    #[test]
    fn qualified_column_with_implicit_alias() {
        let query = parse_ok("SELECT u.name n FROM users u");
        assert_eq!(vec![column(Some("u"), "name", Some("n"))], query.selects);
        assert_eq!(vec![table("users", Some("u"))], query.froms);
    }

    #[test]
    fn backticked_names() {
        let query = parse_ok("SELECT `user`.`name` AS n FROM `users`;");
        assert_eq!(
            vec![column(Some("`user`"), "`name`", Some("n"))],
            query.selects
        );
        assert_eq!(vec![table("`users`", None)], query.froms);
    }

    #[test]
    fn comments_before_select() {
        let query = parse_ok("-- first\n/* second */\nSELECT * FROM users");
        assert_eq!(vec!["-- first", "/* second */"], query.comments);
    }

    #[test]
    fn multiple_tables() {
        let query = parse_ok("SELECT * FROM users U, people;");
        assert_eq!(
            vec![table("users", Some("U")), table("people", None)],
            query.froms
        );
    }

    #[test]
    fn ambiguous_table_identifier() {
        let parsed = parse("SELECT * FROM users U user;");
        assert_eq!(
            Some(ParseError::AmbiguousIdentifier {
                name: "users".to_string(),
                alias: "U".to_string(),
                ident: "user".to_string(),
            }),
            parsed.error
        );
        // Tables are only committed once complete.
        assert!(parsed.value.froms.is_empty());
    }

    #[test]
    fn missing_comma_between_columns() {
        let parsed = parse("SELECT user.id user.* name FROM users;");
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnexpectedToken {
                state: "columns",
                kind: TokenKind::Dot,
                ..
            })
        ));
    }

    #[test]
    fn as_requires_identifier() {
        let parsed = parse("SELECT name AS 'x' FROM users");
        assert!(matches!(parsed.error, Some(ParseError::Expected { .. })));
    }

    #[test]
    fn empty_column_rejected() {
        let parsed = parse("SELECT , name FROM users");
        assert_eq!(
            Some(ParseError::InvalidValue {
                what: "select column"
            }),
            parsed.error
        );
    }

    #[test]
    fn empty_table_rejected() {
        let parsed = parse("SELECT * FROM ;");
        assert_eq!(
            Some(ParseError::InvalidValue {
                what: "table in FROM clause"
            }),
            parsed.error
        );
    }

    #[test]
    fn unsupported_statement() {
        let parsed = parse("WITH x AS y SELECT 1");
        assert_eq!(
            Some(ParseError::UnsupportedKeyword {
                keyword: "WITH".to_string(),
                line: 1,
            }),
            parsed.error
        );
        assert_eq!(None, parsed.value.statement);

        let parsed = parse("users");
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnexpectedToken {
                state: "statement",
                ..
            })
        ));
    }

    #[test]
    fn missing_from() {
        let parsed = parse("SELECT name");
        assert!(matches!(
            parsed.error,
            Some(ParseError::UnexpectedToken {
                state: "columns",
                kind: TokenKind::EndOfInput,
                ..
            })
        ));
    }

    #[test]
    fn where_clause_is_skipped() {
        let query = parse_ok("SELECT * FROM users u WHERE u.id = 1;");
        assert_eq!(vec![table("users", Some("u"))], query.froms);
    }

    #[test]
    fn join_is_skipped() {
        for keyword in ["JOIN", "INNER", "OUTER", "LEFT", "RIGHT", "FULL", "left"] {
            let query = parse_ok(&format!(
                "SELECT * FROM users u {keyword} JOIN orders o ON u.id = o.user_id"
            ));
            assert_eq!(vec![table("users", Some("u"))], query.froms, "{keyword}");
        }
    }

    #[test]
    fn lex_error_reported() {
        let parsed = parse("SELECT name FROM `users WHERE foo = 'bar';");
        assert_eq!(
            Some(ParseError::Lex {
                line: 1,
                message: "unterminated backtick".to_string(),
            }),
            parsed.error
        );
        assert_eq!(vec![column(None, "name", None)], parsed.value.selects);
    }

    #[test]
    fn tokens_after_statement_end_ignored() {
        let query = parse_ok("SELECT a FROM b; SELECT c FROM d;");
        assert_eq!(vec![column(None, "a", None)], query.selects);
        assert_eq!(vec![table("b", None)], query.froms);
    }
}
