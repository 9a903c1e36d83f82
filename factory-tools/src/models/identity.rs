use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const NAMESPACE_SEPARATOR: char = '\\';

/// The fully qualified class name of a model, such as `App\Models\Blog\Post`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ModelIdentity(String);

impl ModelIdentity {
    /// Creates an identity, dropping any leading separator so `\App\Models\Post` and
    /// `App\Models\Post` are the same model.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(
            name.as_ref()
                .trim_start_matches(NAMESPACE_SEPARATOR)
                .to_string(),
        )
    }

    /// Joins namespace segments into an identity, skipping empty segments.
    pub fn from_segments<S: AsRef<str>>(segments: impl IntoIterator<Item = S>) -> Self {
        let mut name = String::new();
        for segment in segments {
            let segment = segment.as_ref().trim_matches(NAMESPACE_SEPARATOR);
            if segment.is_empty() {
                continue;
            }
            if !name.is_empty() {
                name.push(NAMESPACE_SEPARATOR);
            }
            name.push_str(segment);
        }

        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The class name without its namespace.
    pub fn short_name(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// The namespace segments between `namespace` and the short name.
    ///
    /// `App\Models\Blog\Post` relative to `App\Models` is `["Blog"]`. Returns `None` when
    /// the identity does not live below `namespace`.
    pub fn namespace_below(&self, namespace: &str) -> Option<Vec<&str>> {
        let namespace = namespace.trim_matches(NAMESPACE_SEPARATOR);
        let rest = if namespace.is_empty() {
            self.0.as_str()
        } else {
            self.0
                .strip_prefix(namespace)?
                .strip_prefix(NAMESPACE_SEPARATOR)?
        };

        let mut segments: Vec<&str> = rest.split(NAMESPACE_SEPARATOR).collect();
        segments.pop();

        Some(segments)
    }
}

impl From<String> for ModelIdentity {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ModelIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ModelIdentity> for String {
    fn from(value: ModelIdentity) -> Self {
        value.0
    }
}

impl Display for ModelIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
