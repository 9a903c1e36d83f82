use crate::database::{DatabaseDriver, QueryExecutor, SqlRow};
use crate::{FactoryToolsError, Result};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::instrument;

/// Wraps a sqlx pool in a [QueryExecutor].
///
/// The pool is limited to a single connection, since the generator only ever runs one query
/// at a time. This also makes `sqlite::memory:` behave as one database instead of one per
/// pooled connection.
macro_rules! define_sqlx_wrapper {
    ($name:ident, $pool:ty, $options:ty, $driver:expr) => {
        pub struct $name {
            pool: $pool,
        }

        impl $name {
            #[instrument(skip_all)]
            pub async fn new(url: &str) -> Result<Self> {
                let pool = <$options>::new().max_connections(1).connect(url).await?;

                Ok(Self { pool })
            }

            pub async fn execute_non_query(&self, sql: &str) -> Result {
                sqlx::raw_sql(sql).execute(&self.pool).await.map_err(|e| {
                    FactoryToolsError::SqlxErrorWithQuery {
                        source: e,
                        query: sql.to_string(),
                    }
                })?;

                Ok(())
            }
        }

        impl QueryExecutor for $name {
            fn driver(&self) -> DatabaseDriver {
                $driver
            }

            async fn select(&self, sql: &str, params: &[&str]) -> Result<Vec<SqlRow>> {
                let mut query = sqlx::query(sql);
                for param in params {
                    query = query.bind(*param);
                }

                let rows = query.fetch_all(&self.pool).await.map_err(|e| {
                    FactoryToolsError::SqlxErrorWithQuery {
                        source: e,
                        query: sql.to_string(),
                    }
                })?;

                let mut output = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut values = Vec::with_capacity(row.len());
                    for idx in 0..row.len() {
                        values.push(row.try_get::<Option<String>, _>(idx)?);
                    }
                    output.push(SqlRow::new(values));
                }

                Ok(output)
            }
        }
    };
}

define_sqlx_wrapper!(
    MySqlPoolWrapper,
    MySqlPool,
    MySqlPoolOptions,
    DatabaseDriver::MySql
);
define_sqlx_wrapper!(
    SqlitePoolWrapper,
    SqlitePool,
    SqlitePoolOptions,
    DatabaseDriver::Sqlite
);
