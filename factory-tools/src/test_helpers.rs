use crate::config::ConnectionConfig;
use crate::database::{ConnectionProvider, DatabaseDriver, QueryExecutor, SqlRow, SqlitePoolWrapper};
use crate::{FactoryToolsError, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

type QueryHandler = Box<dyn Fn(&str, &[&str]) -> Result<Vec<SqlRow>> + Send + Sync>;

/// A [QueryExecutor] that answers queries from a closure instead of a database.
///
/// Every query is recorded together with its parameters, so tests can check what was asked.
pub struct FakeExecutor {
    driver: DatabaseDriver,
    handler: QueryHandler,
    queries: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeExecutor {
    pub fn new(
        driver: DatabaseDriver,
        handler: impl Fn(&str, &[&str]) -> Result<Vec<SqlRow>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            driver,
            handler: Box::new(handler),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// An executor that returns no rows for any query.
    pub fn empty(driver: DatabaseDriver) -> Self {
        Self::new(driver, |_, _| Ok(Vec::new()))
    }

    /// An executor where every query fails.
    pub fn failing(driver: DatabaseDriver) -> Self {
        Self::new(driver, |_, _| {
            Err(FactoryToolsError::UnknownConnection("offline".to_string()))
        })
    }

    /// The queries run so far, with their parameters.
    pub fn queries(&self) -> Vec<(String, Vec<String>)> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl QueryExecutor for FakeExecutor {
    fn driver(&self) -> DatabaseDriver {
        self.driver
    }

    async fn select(&self, sql: &str, params: &[&str]) -> Result<Vec<SqlRow>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((
                sql.to_string(),
                params.iter().map(|p| p.to_string()).collect(),
            ));
        }

        (self.handler)(sql, params)
    }
}

/// A [ConnectionProvider] handing out [FakeExecutor]s.
pub struct FakeConnections {
    default_connection: String,
    connections: BTreeMap<String, (ConnectionConfig, FakeExecutor)>,
}

impl FakeConnections {
    /// A provider where the default connection is the given executor.
    pub fn new(executor: FakeExecutor) -> Self {
        Self::default().with_connection("default", ConnectionConfig::default(), executor)
    }

    pub fn with_connection(
        mut self,
        name: &str,
        config: ConnectionConfig,
        executor: FakeExecutor,
    ) -> Self {
        self.connections
            .insert(name.to_string(), (config, executor));
        self
    }

    pub fn executor(&self, name: &str) -> Option<&FakeExecutor> {
        self.connections.get(name).map(|(_, executor)| executor)
    }
}

impl Default for FakeConnections {
    fn default() -> Self {
        Self {
            default_connection: "default".to_string(),
            connections: BTreeMap::new(),
        }
    }
}

impl ConnectionProvider for FakeConnections {
    type Executor = FakeExecutor;

    fn settings(&self, name: Option<&str>) -> Result<&ConnectionConfig> {
        let name = name.unwrap_or(&self.default_connection);
        self.connections
            .get(name)
            .map(|(config, _)| config)
            .ok_or_else(|| FactoryToolsError::UnknownConnection(name.to_string()))
    }

    async fn connection(&mut self, name: Option<&str>) -> Result<&FakeExecutor> {
        let name = name.unwrap_or(&self.default_connection);
        self.connections
            .get(name)
            .map(|(_, executor)| executor)
            .ok_or_else(|| FactoryToolsError::UnknownConnection(name.to_string()))
    }
}

/// Rows where every value is present.
pub fn text_rows<const N: usize>(rows: &[[&str; N]]) -> Vec<SqlRow> {
    rows.iter().map(|row| SqlRow::from(row.to_vec())).collect()
}

/// An in-memory sqlite database with the given tables created.
pub async fn sqlite_database(ddl: &str) -> SqlitePoolWrapper {
    let db = SqlitePoolWrapper::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory sqlite database");
    db.execute_non_query(ddl)
        .await
        .expect("Failed to create test tables");
    db
}
