use crate::config::ConnectionConfig;
use crate::database::{DatabaseConnection, QueryExecutor};
use crate::{FactoryToolsError, Result};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use tracing::debug;

/// Hands out database connections by name.
pub trait ConnectionProvider {
    type Executor: QueryExecutor;

    /// Settings of the named connection, or of the default connection for `None`.
    fn settings(&self, name: Option<&str>) -> Result<&ConnectionConfig>;

    /// The named connection, or the default connection for `None`.
    fn connection(&mut self, name: Option<&str>) -> impl Future<Output = Result<&Self::Executor>>;
}

/// The configured connections. Each is opened the first time a model asks for it and kept
/// for the rest of the run.
pub struct Connections {
    default_connection: String,
    configs: BTreeMap<String, ConnectionConfig>,
    open: HashMap<String, DatabaseConnection>,
}

impl Connections {
    pub fn new(default_connection: &str, configs: BTreeMap<String, ConnectionConfig>) -> Self {
        Self {
            default_connection: default_connection.to_string(),
            configs,
            open: HashMap::new(),
        }
    }

    fn name_or_default<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.unwrap_or(&self.default_connection)
    }
}

impl ConnectionProvider for Connections {
    type Executor = DatabaseConnection;

    fn settings(&self, name: Option<&str>) -> Result<&ConnectionConfig> {
        let name = self.name_or_default(name);
        self.configs
            .get(name)
            .ok_or_else(|| FactoryToolsError::UnknownConnection(name.to_string()))
    }

    async fn connection(&mut self, name: Option<&str>) -> Result<&DatabaseConnection> {
        let name = self.name_or_default(name).to_string();

        if !self.open.contains_key(&name) {
            let config = self
                .configs
                .get(&name)
                .ok_or_else(|| FactoryToolsError::UnknownConnection(name.clone()))?;

            debug!(connection = %name, "Opening database connection");
            let connection = DatabaseConnection::connect(&config.url).await?;
            self.open.insert(name.clone(), connection);
        }

        self.open
            .get(&name)
            .ok_or(FactoryToolsError::UnknownConnection(name))
    }
}
