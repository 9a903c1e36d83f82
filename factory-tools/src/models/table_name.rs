use std::fmt::{Display, Formatter};

/// A table reference as the database sees it, after the connection prefix is applied.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableName {
    /// The schema (Postgres) or database (MySQL, SQLite attachments) the table lives in.
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    /// Splits `database.table` and prefixes the table part.
    pub fn new(table: &str, prefix: &str) -> Self {
        match table.split_once('.') {
            Some((schema, name)) if !schema.is_empty() => Self {
                schema: Some(schema.to_string()),
                name: format!("{prefix}{name}"),
            },
            _ => Self {
                schema: None,
                name: format!("{prefix}{table}"),
            },
        }
    }

    pub fn with_default_schema(mut self, schema: Option<&str>) -> Self {
        if self.schema.is_none() {
            self.schema = schema.map(|s| s.to_string());
        }
        self
    }

    /// `schema.table`, or just `table` when no schema is known.
    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified())
    }
}
