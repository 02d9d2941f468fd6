use serde::{Deserialize, Serialize};

use crate::parser::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Kind of statement, set once the statement keyword has been parsed.
    pub statement: Option<StatementKind>,
    /// Comments preceding the statement keyword, in source order.
    pub comments: Vec<String>,
    /// Projection list.
    pub selects: Vec<Column>,
    /// Tables in the FROM clause.
    pub froms: Vec<Table>,
}

/// A single item in the select list.
///
/// `[<table>.]<column> [[AS] <alias>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub table: Option<String>,
    pub column: String,
    pub alias: Option<String>,
}

impl Column {
    /// Column name used for `*`.
    pub const WILDCARD: &'static str = "*";

    pub fn is_wildcard(&self) -> bool {
        self.column == Self::WILDCARD
    }
}

impl Validate for Column {
    fn is_valid(&self) -> bool {
        !self.column.is_empty()
    }
}

/// A single table in the FROM clause.
///
/// `<name> [<alias>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub alias: Option<String>,
}

impl Validate for Table {
    fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}
