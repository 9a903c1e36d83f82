//! Configuration for factory generation.
//!
//! Settings come from an optional TOML file, with command line values taking precedence.

use crate::emitter::FactoryStyle;
use crate::models::ColumnKind;
use crate::{FactoryToolsError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The file picked up from the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "factory-gen.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// The project root. Every other relative path is resolved against it.
    pub base_path: PathBuf,
    /// Where model manifests live.
    pub models_dir: PathBuf,
    /// Where factories are written.
    pub output_dir: PathBuf,
    /// The namespace of generated factory classes.
    pub factory_namespace: String,
    /// The directory holding the application namespace, `app` in a Laravel project.
    pub app_path: String,
    /// The namespace `app_path` maps to.
    pub app_namespace: String,
    pub style: FactoryStyle,
    /// A directory with templates that replace the built-in ones.
    pub templates_dir: Option<PathBuf>,
    /// The connection used by models that do not name one.
    pub default_connection: String,
    pub connections: BTreeMap<String, ConnectionConfig>,
    /// Per driver mappings from raw database type names to column kinds,
    /// for types the schema reader does not know.
    pub custom_types: BTreeMap<String, BTreeMap<String, ColumnKind>>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            models_dir: PathBuf::from("app").join("Models"),
            output_dir: PathBuf::from("database").join("factories"),
            factory_namespace: r"Database\Factories".to_string(),
            app_path: "app".to_string(),
            app_namespace: "App".to_string(),
            style: FactoryStyle::Class,
            templates_dir: None,
            default_connection: "default".to_string(),
            connections: BTreeMap::new(),
            custom_types: BTreeMap::new(),
        }
    }
}

/// A named database connection.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub url: String,
    /// Prepended to every table name of models on this connection.
    pub prefix: String,
    /// The schema unqualified tables are looked up in. Postgres defaults to `public`.
    pub schema: Option<String>,
}

/// Values from the command line that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_path: Option<PathBuf>,
    pub models_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub style: Option<FactoryStyle>,
    pub templates_dir: Option<PathBuf>,
    pub database_url: Option<String>,
}

impl FactoryConfig {
    /// Loads the config file at `path`. Without a path, [DEFAULT_CONFIG_FILE] in `base_path` is
    /// used if it exists, and the defaults otherwise.
    pub fn load(path: Option<&Path>, base_path: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = base_path.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        Self::from_toml(&content, path.as_ref())
    }

    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| FactoryToolsError::InvalidConfig {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies command line values on top of the loaded configuration.
    pub fn merge_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_path) = overrides.base_path {
            self.base_path = base_path;
        }

        if let Some(models_dir) = overrides.models_dir {
            self.models_dir = models_dir;
        }

        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }

        if let Some(style) = overrides.style {
            self.style = style;
        }

        if let Some(templates_dir) = overrides.templates_dir {
            self.templates_dir = Some(templates_dir);
        }

        if let Some(url) = overrides.database_url {
            self.connections
                .entry(self.default_connection.clone())
                .or_default()
                .url = url;
        }
    }

    /// Resolves a path against [FactoryConfig::base_path] unless it is absolute.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

}
