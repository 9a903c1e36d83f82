use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A column of a model's table, as far as factory generation cares about it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
    pub is_nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: ColumnKind, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            is_nullable,
        }
    }
}

/// The portable type of a column. Driver specific type names are mapped onto these
/// by the schema reader.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnKind {
    String,
    Text,
    Date,
    Time,
    DateTime,
    DateTimeTz,
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Boolean,
    Enum,
    Guid,
    /// A type without a portable counterpart, kept by its raw name.
    Other(String),
}

impl ColumnKind {
    /// Parses the portable name of a kind, as used in config files.
    /// Unknown names become [ColumnKind::Other].
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => ColumnKind::String,
            "text" => ColumnKind::Text,
            "date" => ColumnKind::Date,
            "time" => ColumnKind::Time,
            "datetime" => ColumnKind::DateTime,
            "datetimetz" => ColumnKind::DateTimeTz,
            "integer" => ColumnKind::Integer,
            "bigint" => ColumnKind::BigInt,
            "smallint" => ColumnKind::SmallInt,
            "tinyint" => ColumnKind::TinyInt,
            "decimal" => ColumnKind::Decimal,
            "float" => ColumnKind::Float,
            "boolean" => ColumnKind::Boolean,
            "enum" => ColumnKind::Enum,
            "guid" => ColumnKind::Guid,
            other => ColumnKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Text => "text",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
            ColumnKind::DateTime => "datetime",
            ColumnKind::DateTimeTz => "datetimetz",
            ColumnKind::Integer => "integer",
            ColumnKind::BigInt => "bigint",
            ColumnKind::SmallInt => "smallint",
            ColumnKind::TinyInt => "tinyint",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Enum => "enum",
            ColumnKind::Guid => "guid",
            ColumnKind::Other(name) => name,
        }
    }
}

impl From<String> for ColumnKind {
    fn from(value: String) -> Self {
        ColumnKind::from_name(&value)
    }
}

impl From<ColumnKind> for String {
    fn from(value: ColumnKind) -> Self {
        value.as_str().to_string()
    }
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
