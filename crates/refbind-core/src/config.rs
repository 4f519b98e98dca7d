//! TOML configuration for a binding session.
//!
//! ```toml
//! warn_stale_snapshots = true
//! default_date_obtained = "2022-11-11T12:19:54.52"
//!
//! [fields]
//! nationality = "root"
//! grade = "nested-object"
//! ```

use crate::{
    model::DateObtained,
    ownership::{FieldTable, Ownership},
};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config cannot redefine built-in field '{field}'")]
    BuiltinOverride { field: String },
}

///
/// BindingConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BindingConfig {
    /// Emit a warn-level event when a resolved Reference has a stale snapshot.
    pub warn_stale_snapshots: bool,

    /// Date pre-filled into blank Source drafts.
    pub default_date_obtained: Option<DateObtained>,

    /// Extra field rows for the capability table.
    pub fields: BTreeMap<String, Ownership>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            warn_stale_snapshots: true,
            default_date_obtained: None,
            fields: BTreeMap::new(),
        }
    }
}

impl BindingConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    /// Built-in rows plus configured rows. Configured rows may only add
    /// fields.
    pub fn field_table(&self) -> Result<FieldTable, ConfigError> {
        let mut table = FieldTable::builtin();

        for (field, ownership) in &self.fields {
            if FieldTable::is_builtin(field) {
                return Err(ConfigError::BuiltinOverride {
                    field: field.clone(),
                });
            }
            table.insert(field.clone(), *ownership);
        }

        Ok(table)
    }

    #[must_use]
    pub fn default_date(&self) -> DateObtained {
        self.default_date_obtained.unwrap_or_default()
    }
}

///
/// TESTS
///
