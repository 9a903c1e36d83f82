use crate::database::{DatabaseDriver, FromRow, QueryExecutor, SqlRow};
use crate::models::{ColumnDescriptor, ColumnKind, TableName};
use crate::schema_reader::enumeration::POSTGRES_DEFAULT_SCHEMA;
use crate::schema_reader::table_column::{
    TableColumnsResult, MYSQL_COLUMNS_QUERY, MYSQL_SCHEMA_COLUMNS_QUERY, POSTGRES_COLUMNS_QUERY,
    SQLITE_COLUMNS_QUERY, SQLITE_SCHEMA_COLUMNS_QUERY,
};
use crate::Result;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

mod enumeration;
mod table_column;

pub use enumeration::EnumStrategy;

/// Reads the parts of a table's definition the generator needs: its columns and
/// the permitted values of enumeration constrained columns.
pub struct SchemaReader<'a, E: QueryExecutor> {
    connection: &'a E,
    custom_types: Option<&'a BTreeMap<String, ColumnKind>>,
}

impl<'a, E: QueryExecutor> SchemaReader<'a, E> {
    pub fn new(connection: &'a E) -> Self {
        Self {
            connection,
            custom_types: None,
        }
    }

    /// Raw type names that map to a given kind before the built-in mappings are consulted.
    pub fn with_custom_types(
        mut self,
        custom_types: Option<&'a BTreeMap<String, ColumnKind>>,
    ) -> Self {
        self.custom_types = custom_types;
        self
    }

    pub fn driver(&self) -> DatabaseDriver {
        self.connection.driver()
    }

    /// The columns of the table in their physical order.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn list_columns(&self, table: &TableName) -> Result<Vec<ColumnDescriptor>> {
        let driver = self.connection.driver();

        let rows = match driver {
            DatabaseDriver::Postgres => {
                let schema = table.schema.as_deref().unwrap_or(POSTGRES_DEFAULT_SCHEMA);
                self.connection
                    .select(POSTGRES_COLUMNS_QUERY, &[schema, &table.name])
                    .await?
            }
            DatabaseDriver::MySql => match &table.schema {
                Some(schema) => {
                    self.connection
                        .select(MYSQL_SCHEMA_COLUMNS_QUERY, &[schema, &table.name])
                        .await?
                }
                None => self.connection.select(MYSQL_COLUMNS_QUERY, &[&table.name]).await?,
            },
            DatabaseDriver::Sqlite => match &table.schema {
                Some(schema) => {
                    self.connection
                        .select(SQLITE_SCHEMA_COLUMNS_QUERY, &[&table.name, schema])
                        .await?
                }
                None => self.connection.select(SQLITE_COLUMNS_QUERY, &[&table.name]).await?,
            },
            DatabaseDriver::Other => {
                warn!("Columns can not be listed for this kind of database");
                return Ok(Vec::new());
            }
        };

        let columns = read_rows::<TableColumnsResult>(&rows)?
            .iter()
            .map(|c| c.to_column_descriptor(driver, self.custom_types))
            .collect::<Vec<_>>();

        debug!(count = columns.len(), "Listed columns");

        Ok(columns)
    }

    /// The permitted values of an enumeration constrained column.
    ///
    /// Failing lookups are logged and treated as the column not being constrained.
    #[instrument(skip_all, fields(table = %table, field = field))]
    pub async fn enum_values(&self, table: &TableName, field: &str) -> Option<Vec<String>> {
        let strategy = EnumStrategy::for_driver(self.connection.driver());

        match strategy.values(self.connection, table, field).await {
            Ok(values) => values,
            Err(e) => {
                debug!("Could not read enumeration values: {}", e);
                None
            }
        }
    }
}

fn read_rows<T: FromRow>(rows: &[SqlRow]) -> Result<Vec<T>> {
    rows.iter().map(T::from_row).collect()
}
