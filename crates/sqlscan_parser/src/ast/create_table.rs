use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: String,
    /// Comments preceding the CREATE keyword, in source order.
    pub comments: Vec<String>,
    pub columns: Vec<TableColumn>,
}

/// A column definition.
///
/// `<name> <type>[(<size>)] [NOT NULL]`, or `<name> ARRAY<<type>[(<size>)]>`
/// for arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    /// Upper-cased base type. For arrays this is the element type.
    pub base_type: String,
    /// Upper-cased size argument, e.g. `MAX` for `STRING(MAX)`.
    pub type_size: Option<String>,
    pub is_array: bool,
    pub not_null: bool,
}

impl TableColumn {
    /// Get the base type if it's one of the known column types.
    pub fn column_type(&self) -> Option<ColumnType> {
        ColumnType::from_name(&self.base_type)
    }
}

impl Validate for TableColumn {
    fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.base_type.is_empty()
    }
}

/// Known column base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    Numeric,
    String,
    Bytes,
    Date,
    Timestamp,
    Json,
}

impl ColumnType {
    pub const ALL: &'static [ColumnType] = &[
        ColumnType::Bool,
        ColumnType::Int64,
        ColumnType::Float64,
        ColumnType::Numeric,
        ColumnType::String,
        ColumnType::Bytes,
        ColumnType::Date,
        ColumnType::Timestamp,
        ColumnType::Json,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Bool => "BOOL",
            ColumnType::Int64 => "INT64",
            ColumnType::Float64 => "FLOAT64",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::String => "STRING",
            ColumnType::Bytes => "BYTES",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Json => "JSON",
        }
    }

    /// Case-insensitive lookup by type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|typ| typ.as_str().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
