use crate::models::identity::ModelIdentity;
use crate::{FactoryToolsError, Result};
use convert_case::{Case, Casing};
use serde::Deserialize;
use std::path::Path;

/// What a model manifest describes. Only [ModelKind::Model] can get a factory.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Model,
    Abstract,
    Interface,
    Trait,
    /// A plain class that is not a model at all.
    Class,
}

impl ModelKind {
    pub fn is_instantiable_model(&self) -> bool {
        matches!(self, ModelKind::Model)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphTo,
    MorphOne,
    MorphMany,
}

/// A relationship declared by a model.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    /// The name of the relationship method, such as `author`.
    pub name: String,
    pub kind: RelationKind,
    /// The class of the related model.
    pub related: ModelIdentity,
    /// The foreign key column. For belongs-to relations this defaults to
    /// `{snake_case(name)}_{owner_key}`.
    #[serde(default)]
    pub foreign_key: Option<String>,
    /// The key on the related model the foreign key points at.
    #[serde(default = "default_primary_key")]
    pub owner_key: String,
}

impl Relation {
    pub fn foreign_key(&self) -> String {
        match &self.foreign_key {
            Some(key) => key.clone(),
            None => format!("{}_{}", self.name.to_case(Case::Snake), self.owner_key),
        }
    }
}

/// Everything the generator needs to know about a model class. Loaded from a TOML manifest.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    #[serde(skip)]
    pub identity: ModelIdentity,
    #[serde(default)]
    pub kind: ModelKind,
    /// The backing table. May be qualified as `database.table`.
    #[serde(default)]
    pub table: Option<String>,
    /// The named connection the table lives on. `None` uses the default connection.
    #[serde(default)]
    pub connection: Option<String>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default = "default_true")]
    pub incrementing: bool,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default = "default_created_at")]
    pub created_at: String,
    #[serde(default = "default_updated_at")]
    pub updated_at: String,
    #[serde(default)]
    pub soft_deletes: bool,
    #[serde(default = "default_deleted_at")]
    pub deleted_at: String,
    /// Columns that are treated as date-times no matter their column type.
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_true() -> bool {
    true
}

fn default_created_at() -> String {
    "created_at".to_string()
}

fn default_updated_at() -> String {
    "updated_at".to_string()
}

fn default_deleted_at() -> String {
    "deleted_at".to_string()
}

impl ModelDefinition {
    /// A model with every setting at its default.
    pub fn new(identity: impl Into<ModelIdentity>) -> Self {
        Self {
            identity: identity.into(),
            kind: ModelKind::Model,
            table: None,
            connection: None,
            primary_key: default_primary_key(),
            incrementing: true,
            timestamps: true,
            created_at: default_created_at(),
            updated_at: default_updated_at(),
            soft_deletes: false,
            deleted_at: default_deleted_at(),
            dates: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn from_toml(identity: ModelIdentity, content: &str, path: &Path) -> Result<Self> {
        let mut model: ModelDefinition =
            toml::from_str(content).map_err(|e| FactoryToolsError::InvalidManifest {
                path: path.to_path_buf(),
                source: e,
            })?;
        model.identity = identity;

        Ok(model)
    }

    /// The table name, either as declared or derived from the class name the way
    /// Eloquent does it (`BlogPost` -> `blog_posts`).
    pub fn table_name(&self) -> String {
        match &self.table {
            Some(table) => table.clone(),
            None => pluralize(&self.identity.short_name().to_case(Case::Snake)),
        }
    }
}

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "equipment",
    "feedback",
    "information",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("man", "men"),
    ("mouse", "mice"),
    ("person", "people"),
    ("woman", "women"),
];

/// English plural of the last word of a snake case name.
fn pluralize(name: &str) -> String {
    let (head, word) = match name.rfind('_') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    };

    if UNCOUNTABLE.contains(&word) {
        return name.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return format!("{head}{plural}");
    }

    let plural = if let Some(stem) = word.strip_suffix('y') {
        if stem.ends_with(&['a', 'e', 'i', 'o', 'u'][..]) {
            format!("{word}s")
        } else {
            format!("{stem}ies")
        }
    } else if word.ends_with(&['s', 'x', 'z'][..]) || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else {
        format!("{word}s")
    };

    format!("{head}{plural}")
}
