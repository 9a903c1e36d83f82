use crate::database::{DatabaseDriver, QueryExecutor};
use crate::models::TableName;
use crate::quoting::quote_identifier;
use crate::Result;
use regex::Regex;
use std::sync::LazyLock;

/// How the permitted values of an enumeration constrained column are read.
///
/// MySQL declares them in the column type, Postgres (as written by Laravel) in a check
/// constraint named `{table}_{field}_check`, and SQLite in a check clause of the stored
/// `create table` statement.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EnumStrategy {
    MySql,
    Postgres,
    Sqlite,
    Unsupported,
}

impl EnumStrategy {
    pub fn for_driver(driver: DatabaseDriver) -> Self {
        match driver {
            DatabaseDriver::MySql => EnumStrategy::MySql,
            DatabaseDriver::Postgres => EnumStrategy::Postgres,
            DatabaseDriver::Sqlite => EnumStrategy::Sqlite,
            DatabaseDriver::Other => EnumStrategy::Unsupported,
        }
    }

    /// The permitted values of the column in declaration order, or `None` when the column is
    /// not constrained to a set of values.
    pub async fn values<E: QueryExecutor>(
        &self,
        connection: &E,
        table: &TableName,
        field: &str,
    ) -> Result<Option<Vec<String>>> {
        let values = match self {
            EnumStrategy::MySql => mysql_values(connection, table, field).await?,
            EnumStrategy::Postgres => postgres_values(connection, table, field).await?,
            EnumStrategy::Sqlite => sqlite_values(connection, table, field).await?,
            EnumStrategy::Unsupported => Vec::new(),
        };

        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(values))
        }
    }
}

//language=mysql
const MYSQL_COLUMN_TYPE_QUERY: &str = r#"
select cast(column_type as char)
from information_schema.columns
where table_schema = database()
  and table_name = ?
  and column_name = ?;
"#;

//language=mysql
const MYSQL_SCHEMA_COLUMN_TYPE_QUERY: &str = r#"
select cast(column_type as char)
from information_schema.columns
where table_schema = ?
  and table_name = ?
  and column_name = ?;
"#;

async fn mysql_values<E: QueryExecutor>(
    connection: &E,
    table: &TableName,
    field: &str,
) -> Result<Vec<String>> {
    let rows = match &table.schema {
        Some(schema) => {
            connection
                .select(MYSQL_SCHEMA_COLUMN_TYPE_QUERY, &[schema, &table.name, field])
                .await?
        }
        None => {
            connection
                .select(MYSQL_COLUMN_TYPE_QUERY, &[&table.name, field])
                .await?
        }
    };

    let Some(row) = rows.first() else {
        return Ok(Vec::new());
    };
    let column_type = row.try_get_text(0)?;

    static QUOTED_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']+)'").unwrap());

    Ok(QUOTED_TOKEN
        .captures_iter(column_type)
        .map(|c| c[1].to_string())
        .collect())
}

//language=postgresql
const POSTGRES_CHECK_CONSTRAINT_QUERY: &str = r#"
select m.matches[1]
from pg_constraint con
         join pg_class cl on cl.oid = con.conrelid
         join pg_namespace ns on ns.oid = cl.relnamespace
         cross join lateral regexp_matches(pg_get_constraintdef(con.oid), '''(.+?)''', 'g')
             with ordinality as m(matches, idx)
where con.contype = 'c'
  and con.conname::text = $1
  and ns.nspname::text = $2
  and cl.relname::text = $3
order by m.idx;
"#;

//language=postgresql
const POSTGRES_NATIVE_ENUM_QUERY: &str = r#"
select e.enumlabel::text
from pg_attribute attr
         join pg_class cl on cl.oid = attr.attrelid
         join pg_namespace ns on ns.oid = cl.relnamespace
         join pg_enum e on e.enumtypid = attr.atttypid
where ns.nspname::text = $1
  and cl.relname::text = $2
  and attr.attname::text = $3
order by e.enumsortorder;
"#;

pub(super) const POSTGRES_DEFAULT_SCHEMA: &str = "public";

async fn postgres_values<E: QueryExecutor>(
    connection: &E,
    table: &TableName,
    field: &str,
) -> Result<Vec<String>> {
    let schema = table.schema.as_deref().unwrap_or(POSTGRES_DEFAULT_SCHEMA);
    let constraint_name = format!("{}_{}_check", table.name, field);

    let rows = connection
        .select(
            POSTGRES_CHECK_CONSTRAINT_QUERY,
            &[&constraint_name, schema, &table.name],
        )
        .await?;

    let rows = if rows.is_empty() {
        connection
            .select(POSTGRES_NATIVE_ENUM_QUERY, &[schema, &table.name, field])
            .await?
    } else {
        rows
    };

    rows.iter()
        .map(|row| row.try_get_text(0).map(|v| v.to_string()))
        .collect()
}

//language=sqlite
const SQLITE_TABLE_SQL_QUERY: &str = r#"
select sql
from sqlite_master
where type = 'table'
  and tbl_name = ?;
"#;

async fn sqlite_values<E: QueryExecutor>(
    connection: &E,
    table: &TableName,
    field: &str,
) -> Result<Vec<String>> {
    let rows = match &table.schema {
        Some(schema) => {
            let sql = format!(
                "select sql from {}.sqlite_master where type = 'table' and tbl_name = ?;",
                quote_identifier(schema)
            );
            connection.select(&sql, &[&table.name]).await?
        }
        None => connection.select(SQLITE_TABLE_SQL_QUERY, &[&table.name]).await?,
    };

    let Some(row) = rows.first() else {
        return Ok(Vec::new());
    };
    let create_statement = row.try_get_text(0)?;

    let check = Regex::new(&format!(
        r#"check \("{}" in \((.+?)\)\)"#,
        regex::escape(field)
    ))?;

    let Some(captures) = check.captures(create_statement) else {
        return Ok(Vec::new());
    };

    Ok(captures[1]
        .split(',')
        .map(|value| value.trim_matches(|c: char| c.is_whitespace() || c == '\'').to_string())
        .collect())
}
