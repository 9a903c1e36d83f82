use crate::database::{DatabaseDriver, QueryExecutor, SqlRow};
use crate::{FactoryToolsError, Result};
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::instrument;

pub struct PostgresClientWrapper {
    client: Client,
    join_handle: JoinHandle<Result<()>>,
}

impl PostgresClientWrapper {
    #[instrument(skip_all)]
    pub async fn new(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // The connection object performs the actual communication with the database,
        // so spawn it off to run on its own.
        let join_handle = tokio::spawn(async move {
            match connection.await {
                Err(e) => Err(FactoryToolsError::PostgresError(e)),
                Ok(_) => Ok(()),
            }
        });

        Ok(PostgresClientWrapper {
            client,
            join_handle,
        })
    }

    /// Runs a query where every selected column is text (or cast to text) and returns
    /// the rows as plain strings.
    pub async fn get_text_results(&self, sql: &str, params: &[&str]) -> Result<Vec<SqlRow>> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let query_results = self.client.query(sql, &params).await.map_err(|e| {
            FactoryToolsError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        let mut output = Vec::with_capacity(query_results.len());

        for row in query_results.into_iter() {
            output.push(text_row(&row)?);
        }

        Ok(output)
    }
}

fn text_row(row: &Row) -> Result<SqlRow> {
    let mut values = Vec::with_capacity(row.len());
    for idx in 0..row.len() {
        values.push(row.try_get::<_, Option<String>>(idx)?);
    }

    Ok(SqlRow::new(values))
}

impl QueryExecutor for PostgresClientWrapper {
    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Postgres
    }

    async fn select(&self, sql: &str, params: &[&str]) -> Result<Vec<SqlRow>> {
        self.get_text_results(sql, params).await
    }
}

impl Drop for PostgresClientWrapper {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}
