use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactoryToolsError {
    #[error("Error from postgres: `{0}`")]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Error from postgres: `{query}` when executing query: `{source}`")]
    PostgresErrorWithQuery {
        query: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("Error from database: `{0}`")]
    SqlxError(#[from] sqlx::Error),

    #[error("Error from database: `{query}` when executing query: `{source}`")]
    SqlxErrorWithQuery {
        query: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Unsupported database url '{0}'. Expected one of postgres://, mysql:// or sqlite:")]
    UnsupportedDatabaseUrl(String),

    #[error("No database connection named '{0}' is configured")]
    UnknownConnection(String),

    #[error("Row returned from the database is missing column {0}")]
    MissingColumn(usize),

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),

    #[error("Invalid model manifest '{path}': {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),
}

pub type Result<T = ()> = std::result::Result<T, FactoryToolsError>;
