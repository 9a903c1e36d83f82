use crate::database::{DatabaseDriver, FromRow, SqlRow};
use crate::models::{ColumnDescriptor, ColumnKind};
use std::collections::BTreeMap;

/// One column as listed by the database. All three drivers select the same four columns:
/// name, base type, type detail and nullability (`'true'`/`'false'`).
#[derive(Debug, Eq, PartialEq)]
pub struct TableColumnsResult {
    pub column_name: String,
    pub data_type: String,
    /// `pg_type.typtype` on Postgres, the full column type (`tinyint(1)`) on MySQL.
    pub type_detail: Option<String>,
    pub is_nullable: bool,
}

impl FromRow for TableColumnsResult {
    fn from_row(row: &SqlRow) -> crate::Result<Self> {
        Ok(TableColumnsResult {
            column_name: row.try_get_text(0)?.to_string(),
            data_type: row.try_get_text(1)?.to_string(),
            type_detail: row.try_get(2)?.map(|s| s.to_string()),
            is_nullable: row.try_get_text(3)? == "true",
        })
    }
}

impl TableColumnsResult {
    pub fn to_column_descriptor(
        &self,
        driver: DatabaseDriver,
        custom_types: Option<&BTreeMap<String, ColumnKind>>,
    ) -> ColumnDescriptor {
        let kind = custom_types
            .and_then(|types| types.get(&self.data_type))
            .cloned()
            .unwrap_or_else(|| self.column_kind(driver));

        ColumnDescriptor::new(&self.column_name, kind, self.is_nullable)
    }

    fn column_kind(&self, driver: DatabaseDriver) -> ColumnKind {
        match driver {
            DatabaseDriver::Postgres => postgres_kind(&self.data_type, self.type_detail.as_deref()),
            DatabaseDriver::MySql => mysql_kind(&self.data_type, self.type_detail.as_deref()),
            DatabaseDriver::Sqlite => sqlite_kind(&self.data_type),
            DatabaseDriver::Other => ColumnKind::Other(self.data_type.clone()),
        }
    }
}

fn postgres_kind(type_name: &str, type_type: Option<&str>) -> ColumnKind {
    if type_type == Some("e") {
        return ColumnKind::Enum;
    }

    match type_name {
        "varchar" | "bpchar" | "char" | "name" | "citext" => ColumnKind::String,
        "text" => ColumnKind::Text,
        "int4" => ColumnKind::Integer,
        "int8" => ColumnKind::BigInt,
        "int2" => ColumnKind::SmallInt,
        "numeric" => ColumnKind::Decimal,
        "float4" | "float8" => ColumnKind::Float,
        "bool" => ColumnKind::Boolean,
        "date" => ColumnKind::Date,
        "time" | "timetz" => ColumnKind::Time,
        "timestamp" => ColumnKind::DateTime,
        "timestamptz" => ColumnKind::DateTimeTz,
        "uuid" => ColumnKind::Guid,
        other => ColumnKind::Other(other.to_string()),
    }
}

fn mysql_kind(data_type: &str, column_type: Option<&str>) -> ColumnKind {
    match data_type.to_ascii_lowercase().as_str() {
        "tinyint" if column_type.is_some_and(|t| t.starts_with("tinyint(1)")) => {
            ColumnKind::Boolean
        }
        "tinyint" => ColumnKind::TinyInt,
        "enum" => ColumnKind::Enum,
        "char" | "varchar" => ColumnKind::String,
        "tinytext" | "text" | "mediumtext" | "longtext" => ColumnKind::Text,
        "int" | "integer" | "mediumint" => ColumnKind::Integer,
        "bigint" => ColumnKind::BigInt,
        "smallint" => ColumnKind::SmallInt,
        "decimal" | "numeric" => ColumnKind::Decimal,
        "float" | "double" | "real" => ColumnKind::Float,
        "bool" | "boolean" => ColumnKind::Boolean,
        "date" => ColumnKind::Date,
        "time" => ColumnKind::Time,
        "datetime" | "timestamp" => ColumnKind::DateTime,
        other => ColumnKind::Other(other.to_string()),
    }
}

/// Sqlite only stores the declared type, so this goes by the declaration Laravel's schema
/// builder writes (`varchar`, `tinyint(1)` for booleans and so on).
fn sqlite_kind(declared_type: &str) -> ColumnKind {
    let declared_type = declared_type.trim().to_ascii_lowercase();
    if declared_type.starts_with("tinyint(1)") {
        return ColumnKind::Boolean;
    }

    let base_type = declared_type
        .split('(')
        .next()
        .unwrap_or_default()
        .trim();

    match base_type {
        "varchar" | "char" | "nvarchar" | "nchar" | "character" | "varying character" => {
            ColumnKind::String
        }
        "text" | "clob" => ColumnKind::Text,
        "integer" | "int" | "mediumint" => ColumnKind::Integer,
        "bigint" => ColumnKind::BigInt,
        "smallint" => ColumnKind::SmallInt,
        "tinyint" => ColumnKind::TinyInt,
        "numeric" | "decimal" => ColumnKind::Decimal,
        "float" | "double" | "real" => ColumnKind::Float,
        "boolean" | "bool" => ColumnKind::Boolean,
        "date" => ColumnKind::Date,
        "time" => ColumnKind::Time,
        "datetime" | "timestamp" => ColumnKind::DateTime,
        other => ColumnKind::Other(other.to_string()),
    }
}

//language=postgresql
pub(super) const POSTGRES_COLUMNS_QUERY: &str = r#"
select attr.attname::text,
       coalesce(non_array_type.typname, t.typname)::text,
       t.typtype::text,
       (not attr.attnotnull)::text as is_nullable
from pg_attribute attr
         join pg_class cl on attr.attrelid = cl.oid
         join pg_namespace ns on ns.oid = cl.relnamespace
         join pg_type t on attr.atttypid = t.oid
         left join pg_type non_array_type
                   on non_array_type.oid = t.typelem and non_array_type.typarray = t.oid
where ns.nspname::text = $1
  and cl.relname::text = $2
  and attr.attnum > 0
  and not attr.attisdropped
order by attr.attnum;
"#;

//language=mysql
pub(super) const MYSQL_COLUMNS_QUERY: &str = r#"
select cast(column_name as char),
       cast(data_type as char),
       cast(column_type as char),
       case when is_nullable = 'YES' then 'true' else 'false' end
from information_schema.columns
where table_schema = database()
  and table_name = ?
order by ordinal_position;
"#;

//language=mysql
pub(super) const MYSQL_SCHEMA_COLUMNS_QUERY: &str = r#"
select cast(column_name as char),
       cast(data_type as char),
       cast(column_type as char),
       case when is_nullable = 'YES' then 'true' else 'false' end
from information_schema.columns
where table_schema = ?
  and table_name = ?
order by ordinal_position;
"#;

//language=sqlite
pub(super) const SQLITE_COLUMNS_QUERY: &str = r#"
select name,
       type,
       null,
       case when "notnull" = 0 then 'true' else 'false' end
from pragma_table_info(?)
order by cid;
"#;

//language=sqlite
pub(super) const SQLITE_SCHEMA_COLUMNS_QUERY: &str = r#"
select name,
       type,
       null,
       case when "notnull" = 0 then 'true' else 'false' end
from pragma_table_info(?, ?)
order by cid;
"#;
