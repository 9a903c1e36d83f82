//! Renders the factory source file of a model.

use crate::models::ModelIdentity;
use crate::quoting::php_string;
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use tera::{Context, Tera};
use tracing::debug;

/// The shape of the generated factory.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryStyle {
    /// A `Factory` subclass with a `definition()` method (Laravel 8 and later).
    #[default]
    Class,
    /// A `$factory->define(...)` closure (before Laravel 8).
    Method,
}

impl FactoryStyle {
    /// The expression the generated code reaches the faker generator through.
    pub fn faker_receiver(&self) -> &'static str {
        match self {
            FactoryStyle::Class => "$this->faker",
            FactoryStyle::Method => "$faker",
        }
    }

    /// The file name of the template, also used when looking for a user supplied one.
    pub fn template_name(&self) -> &'static str {
        match self {
            FactoryStyle::Class => "class-factory.php.tera",
            FactoryStyle::Method => "method-factory.php.tera",
        }
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            FactoryStyle::Class => include_str!("../templates/class-factory.php.tera"),
            FactoryStyle::Method => include_str!("../templates/method-factory.php.tera"),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FactoryStyle::Class => "class",
            FactoryStyle::Method => "method",
        }
    }
}

impl FromStr for FactoryStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Ok(FactoryStyle::Class),
            "method" => Ok(FactoryStyle::Method),
            _ => Err(format!("Unknown factory style '{s}', expected 'class' or 'method'")),
        }
    }
}

impl Display for FactoryStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct Property<'a> {
    key: String,
    expression: &'a str,
}

pub struct FactoryRenderer {
    tera: Tera,
    style: FactoryStyle,
}

impl FactoryRenderer {
    /// Prepares the template of the style. A file named after the template in
    /// `templates_dir` replaces the built-in one.
    pub fn new(style: FactoryStyle, templates_dir: Option<&Path>) -> Result<Self> {
        let template = match templates_dir.map(|dir| dir.join(style.template_name())) {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "Using custom factory template");
                std::fs::read_to_string(&path)?
            }
            _ => style.builtin_template().to_string(),
        };

        let mut tera = Tera::default();
        tera.add_raw_template(style.template_name(), &template)?;

        Ok(Self { tera, style })
    }

    /// Renders the factory of `model`. Properties are emitted in map order.
    pub fn render(
        &self,
        model: &ModelIdentity,
        factory_namespace: &str,
        properties: &IndexMap<String, String>,
    ) -> Result<String> {
        let properties = properties
            .iter()
            .map(|(name, expression)| Property {
                key: php_string(name),
                expression,
            })
            .collect::<Vec<_>>();

        let mut context = Context::new();
        context.insert("factory_namespace", factory_namespace);
        context.insert("factory_name", &format!("{}Factory", model.short_name()));
        context.insert("model_class", model.as_str());
        context.insert("model_name", model.short_name());
        context.insert("properties", &properties);

        Ok(self.tera.render(self.style.template_name(), &context)?)
    }
}
