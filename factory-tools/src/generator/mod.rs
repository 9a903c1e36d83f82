use crate::database::{ConnectionProvider, QueryExecutor};
use crate::emitter::FactoryStyle;
use crate::models::{ColumnKind, ModelDefinition, TableName};
use crate::schema_reader::SchemaReader;
use crate::Result;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

mod classifier;
mod mapper;
mod relations;

pub use classifier::is_fakeable;
pub use mapper::GeneratorMapper;
pub use relations::scan_relationships;

/// Works out the properties of a model's factory: one faker expression per column, plus
/// factories of the models it belongs to.
pub struct PropertyResolver<'a> {
    mapper: GeneratorMapper,
    custom_types: &'a BTreeMap<String, BTreeMap<String, ColumnKind>>,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(
        style: FactoryStyle,
        custom_types: &'a BTreeMap<String, BTreeMap<String, ColumnKind>>,
    ) -> Self {
        Self {
            mapper: GeneratorMapper::new(style),
            custom_types,
        }
    }

    /// Resolves the properties of `model` against the connection the model lives on.
    #[instrument(skip_all, fields(model = %model.identity))]
    pub async fn resolve<P: ConnectionProvider>(
        &self,
        model: &ModelDefinition,
        connections: &mut P,
    ) -> Result<IndexMap<String, String>> {
        let connection_name = model.connection.as_deref();

        let settings = connections.settings(connection_name)?;
        let table = TableName::new(&model.table_name(), &settings.prefix)
            .with_default_schema(settings.schema.as_deref());

        let connection = connections.connection(connection_name).await?;
        let reader = SchemaReader::new(connection)
            .with_custom_types(self.custom_types.get(connection.driver().config_key()));

        self.resolve_with(model, &reader, &table).await
    }

    /// Resolves the properties of `model` from an already located table.
    ///
    /// Columns come first, in table order. A belongs-to foreign key replaces the column's
    /// expression in place, or is appended if the table has no such column.
    pub async fn resolve_with<E: QueryExecutor>(
        &self,
        model: &ModelDefinition,
        reader: &SchemaReader<'_, E>,
        table: &TableName,
    ) -> Result<IndexMap<String, String>> {
        let mut properties = IndexMap::new();

        for column in reader.list_columns(table).await? {
            if !is_fakeable(&column.name, model) {
                debug!(column = %column.name, "Skipping column maintained by the model");
                continue;
            }

            let kind = if model.dates.contains(&column.name) {
                ColumnKind::DateTime
            } else {
                column.kind
            };

            let enum_values = reader.enum_values(table, &column.name).await;
            let expression = self.mapper.map_field(
                &column.name,
                &kind,
                column.is_nullable,
                enum_values.as_deref(),
            );

            properties.insert(column.name, expression);
        }

        for (field, expression) in scan_relationships(model, &self.mapper) {
            properties.insert(field, expression);
        }

        Ok(properties)
    }
}
