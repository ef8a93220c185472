//! Form configuration loading and lookup
//!
//! A form is a named, ordered list of field descriptors. The same list
//! drives input-form layout and export column order, so order is preserved
//! exactly as configured.

use crate::core::error::ConfigError;
use crate::core::field::FieldDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Registry of form definitions, keyed by form name
///
/// # Example configuration
///
/// ```yaml
/// forms:
///   skeleton-single:
///     - key: label
///       label: Name
///       type: text
///     - key: category
///       label: Categories
///       type: multiselect
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormRegistry {
    #[serde(default)]
    forms: IndexMap<String, Vec<FieldDescriptor>>,
}

impl FormRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load a registry from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Register a form definition, replacing any existing one
    pub fn register(&mut self, form_name: impl Into<String>, fields: Vec<FieldDescriptor>) {
        self.forms.insert(form_name.into(), fields);
    }

    /// The ordered field descriptors of a form
    pub fn fields(&self, form_name: &str) -> Result<&[FieldDescriptor], ConfigError> {
        self.forms
            .get(form_name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::UnknownForm(form_name.to_string()))
    }

    /// The entity type prefix of a form name: text before the first `-`
    pub fn entity_type_prefix(form_name: &str) -> &str {
        form_name.split('-').next().unwrap_or(form_name)
    }
}
