use crate::model::Source;
use serde::{Deserialize, Serialize};

///
/// Reference
///
/// Binds a field (plus a snapshot of its value) to an ordered list of
/// Sources. A Reference with no Sources is logically deleted and must not
/// remain in any partition.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Reference {
    pub field: String,
    #[serde(default)]
    pub content: String,
    pub sources: Vec<Source>,
}

impl Reference {
    /// Start a Reference with its first Source.
    #[must_use]
    pub fn new(field: impl Into<String>, content: impl Into<String>, source: Source) -> Self {
        Self {
            field: field.into(),
            content: content.into(),
            sources: vec![source],
        }
    }

    /// Match by field, and by snapshot content when `content` is given.
    #[must_use]
    pub fn matches(&self, field: &str, content: Option<&str>) -> bool {
        self.field == field && content.is_none_or(|c| self.content == c)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
