//! Finds model manifests and maps them to class names.
//!
//! A manifest at `app/Models/Blog/Post.toml` describes `App\Models\Blog\Post`: path
//! separators become namespace separators and the application directory becomes the
//! application namespace.

use crate::config::FactoryConfig;
use crate::models::{ModelDefinition, ModelIdentity, ModelKind, NAMESPACE_SEPARATOR};
use crate::Result;
use itertools::Itertools;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

pub const MANIFEST_EXTENSION: &str = "toml";

/// What a class name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Model(ModelDefinition),
    /// The manifest exists, but describes something that can not have a factory.
    NotAModel(ModelKind),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models_dir: PathBuf,
    models_namespace: String,
    app_dir: PathBuf,
    app_namespace: String,
    recursive: bool,
}

impl ModelCatalog {
    /// A catalog over the configured models directory. `namespace` replaces the namespace
    /// otherwise inferred from the directory.
    pub fn new(config: &FactoryConfig, namespace: Option<&str>, recursive: bool) -> Self {
        let relative_models_dir = config
            .models_dir
            .strip_prefix(&config.base_path)
            .unwrap_or(&config.models_dir);

        let models_namespace = match namespace {
            Some(namespace) => ModelIdentity::new(namespace)
                .as_str()
                .trim_end_matches(NAMESPACE_SEPARATOR)
                .to_string(),
            None => namespace_for_path(
                relative_models_dir,
                &config.app_path,
                &config.app_namespace,
            ),
        };

        Self {
            models_dir: config.resolve_path(&config.models_dir),
            models_namespace,
            app_dir: config.resolve_path(Path::new(&config.app_path)),
            app_namespace: config.app_namespace.clone(),
            recursive,
        }
    }

    pub fn models_namespace(&self) -> &str {
        &self.models_namespace
    }

    /// The models to generate factories for. Explicit names are used when given,
    /// otherwise the models directory is scanned. Each model is listed once.
    pub fn targets(&self, names: &[String]) -> Vec<ModelIdentity> {
        let targets = if names.is_empty() {
            self.discover()
        } else {
            names.iter().map(|name| self.identity_for_name(name)).collect()
        };

        targets.into_iter().unique().collect()
    }

    /// The class name a command line argument refers to. Names containing a namespace
    /// separator are taken as they are, anything else is relative to the models directory.
    pub fn identity_for_name(&self, name: &str) -> ModelIdentity {
        if name.contains(NAMESPACE_SEPARATOR) {
            return ModelIdentity::new(name);
        }

        let name = name
            .strip_suffix(&format!(".{MANIFEST_EXTENSION}"))
            .unwrap_or(name);

        ModelIdentity::from_segments(
            std::iter::once(self.models_namespace.as_str()).chain(name.split('/')),
        )
    }

    /// All manifests in the models directory, in file name order. Subdirectories are only
    /// searched when recursive.
    #[instrument(skip_all)]
    pub fn discover(&self) -> Vec<ModelIdentity> {
        if !self.models_dir.is_dir() {
            warn!(
                "Models directory '{}' does not exist",
                self.models_dir.display()
            );
            return Vec::new();
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.models_dir)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Could not read models directory entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION)
            })
            .filter_map(|entry| self.identity_for_manifest(entry.path()))
            .collect()
    }

    fn identity_for_manifest(&self, path: &Path) -> Option<ModelIdentity> {
        let relative = path.strip_prefix(&self.models_dir).ok()?.with_extension("");

        Some(ModelIdentity::from_segments(
            std::iter::once(self.models_namespace.clone()).chain(path_segments(&relative)),
        ))
    }

    /// Where the manifest of a class is expected, if the class is inside the models or
    /// application namespace.
    pub fn manifest_path(&self, identity: &ModelIdentity) -> Option<PathBuf> {
        let (dir, rest) = match strip_namespace(identity.as_str(), &self.models_namespace) {
            Some(rest) => (&self.models_dir, rest),
            None => (
                &self.app_dir,
                strip_namespace(identity.as_str(), &self.app_namespace)?,
            ),
        };

        let mut path = dir.clone();
        for segment in rest.split(NAMESPACE_SEPARATOR) {
            path.push(segment);
        }
        path.set_extension(MANIFEST_EXTENSION);

        Some(path)
    }

    /// Loads the manifest of a class.
    pub async fn resolve(&self, identity: &ModelIdentity) -> Result<Resolution> {
        let Some(path) = self.manifest_path(identity) else {
            return Ok(Resolution::NotFound);
        };

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Resolution::NotFound);
        }

        debug!("Loading model '{}' from '{}'", identity, path.display());
        let content = tokio::fs::read_to_string(&path).await?;
        let model = ModelDefinition::from_toml(identity.clone(), &content, &path)?;

        if model.kind.is_instantiable_model() {
            Ok(Resolution::Model(model))
        } else {
            Ok(Resolution::NotAModel(model.kind))
        }
    }
}

fn path_segments(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|component| match component {
        Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
        _ => None,
    })
}

/// The namespace of a directory, such as `App\Models` for `app/Models`.
fn namespace_for_path(path: &Path, app_path: &str, app_namespace: &str) -> String {
    let mut segments = path_segments(path).collect_vec();
    if let Some(first) = segments.first_mut() {
        if *first == app_path {
            *first = app_namespace.to_string();
        }
    }

    ModelIdentity::from_segments(segments).into()
}

/// The rest of `name` after `namespace`, if it is inside it.
fn strip_namespace<'a>(name: &'a str, namespace: &str) -> Option<&'a str> {
    if namespace.is_empty() {
        return Some(name);
    }

    name.strip_prefix(namespace)?
        .strip_prefix(NAMESPACE_SEPARATOR)
        .filter(|rest| !rest.is_empty())
}
