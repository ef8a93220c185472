//! The generic entity row and its dynamic field capabilities
//!
//! One entity type serves every module: system columns are fixed struct
//! fields, everything else lives in an open-ended key/value map keyed by
//! the field keys of the module's form configuration. Typed access goes
//! through three capability traits, one per access pattern:
//!
//! - [`ScalarField`]: raw scalar values, resolved from the hydrated row
//! - [`ReferenceField`]: single tag references, resolved lazily per call
//! - [`MultiReferenceField`]: tag association sets, resolved lazily per call

use crate::core::error::EntableError;
use crate::core::field::FieldValue;
use crate::core::tag::Tag;
use crate::storage::TagStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entity row: system columns plus dynamic fields.
///
/// Identity 0 means unsaved; the store assigns a fresh identifier on first
/// insert and it never changes afterwards. Audit fields are stamped by the
/// persistence layer on every save, never taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Numeric identity; 0 until the first insert
    pub id: u64,

    /// Entity kind discriminator shared with the tag-relation table
    pub entity_type: String,

    /// Required display label
    pub label: String,

    /// User that created the row
    pub created_by: u64,

    /// Creation timestamp
    pub created_date: DateTime<Utc>,

    /// User that last modified the row
    pub modified_by: u64,

    /// Last modification timestamp
    pub modified_date: DateTime<Utc>,

    /// Dynamic field values keyed by field key
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Entity {
    /// Create a new unsaved entity
    pub fn new(entity_type: impl Into<String>, label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            entity_type: entity_type.into(),
            label: label.into(),
            created_by: 0,
            created_date: now,
            modified_by: 0,
            modified_date: now,
            fields: HashMap::new(),
        }
    }

    /// Check whether this entity has been inserted yet
    pub fn is_unsaved(&self) -> bool {
        self.id == 0
    }

    /// Set a dynamic field value, replacing any existing one
    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style variant of [`Entity::set_field`]
    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.set_field(key, value);
        self
    }

    /// Get a dynamic field value by key
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Resolve a column name to its text representation for filtering and
    /// ordering.
    ///
    /// System columns come first; anything else falls back to the dynamic
    /// scalar fields. Timestamps render as `YYYY-MM-DD HH:MM:SS` so prefix
    /// filters like `created_date-like = "2024-03-01"` match a whole day.
    pub fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "label" => Some(self.label.clone()),
            "created_by" => Some(self.created_by.to_string()),
            "modified_by" => Some(self.modified_by.to_string()),
            "created_date" => Some(self.created_date.format("%Y-%m-%d %H:%M:%S").to_string()),
            "modified_date" => Some(self.modified_date.format("%Y-%m-%d %H:%M:%S").to_string()),
            _ => self.text_field(column).map(str::to_string),
        }
    }
}

/// Read access to raw scalar field values.
///
/// A missing key, a null value, or a reference-typed value all yield `None`;
/// scalar access never fails. The system `label` column is reachable here
/// too, because forms list it alongside the dynamic fields.
pub trait ScalarField {
    /// Get the raw scalar value stored under `key`
    fn text_field(&self, key: &str) -> Option<&str>;
}

impl ScalarField for Entity {
    fn text_field(&self, key: &str) -> Option<&str> {
        if key == "label" {
            return Some(&self.label);
        }
        self.fields.get(key).and_then(FieldValue::as_text)
    }
}

/// Read access to single tag references (select fields).
///
/// Resolution is lazy: each call queries the tag store. A missing key or a
/// dangling reference (tag deleted since the row was written) yields
/// `Ok(None)`, never an error.
#[async_trait]
pub trait ReferenceField {
    /// Resolve the tag referenced under `key`
    async fn select_field(
        &self,
        key: &str,
        tags: &dyn TagStore,
    ) -> Result<Option<Tag>, EntableError>;
}

#[async_trait]
impl ReferenceField for Entity {
    async fn select_field(
        &self,
        key: &str,
        tags: &dyn TagStore,
    ) -> Result<Option<Tag>, EntableError> {
        let Some(tag_id) = self.fields.get(key).and_then(FieldValue::as_tag) else {
            return Ok(None);
        };
        Ok(tags.tag(tag_id).await?)
    }
}

/// Read access to tag association sets (multiselect fields).
///
/// The side table is authoritative: each call queries the associations for
/// this entity and key, then resolves every linked tag. Dangling links are
/// skipped. Order is whatever the store returns; it is not otherwise
/// guaranteed.
#[async_trait]
pub trait MultiReferenceField {
    /// Resolve all tags associated with `key` for this entity
    async fn multi_select_field(
        &self,
        key: &str,
        tags: &dyn TagStore,
    ) -> Result<Vec<Tag>, EntableError>;
}

#[async_trait]
impl MultiReferenceField for Entity {
    async fn multi_select_field(
        &self,
        key: &str,
        tags: &dyn TagStore,
    ) -> Result<Vec<Tag>, EntableError> {
        let links = tags.links_for(self.id, &self.entity_type, key).await?;
        let mut resolved = Vec::with_capacity(links.len());
        for link in links {
            if let Some(tag) = tags.tag(link.tag_id).await? {
                resolved.push(tag);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_is_unsaved() {
        let entity = Entity::new("skeleton", "First");
        assert!(entity.is_unsaved());
        assert_eq!(entity.label, "First");
        assert_eq!(entity.entity_type, "skeleton");
    }

    #[test]
    fn test_text_field_access() {
        let entity = Entity::new("skeleton", "First")
            .with_field("website", FieldValue::Text("https://example.com".to_string()))
            .with_field("category", FieldValue::Tag(4))
            .with_field("empty", FieldValue::Null);

        assert_eq!(entity.text_field("website"), Some("https://example.com"));
        // The system label is reachable through the scalar accessor
        assert_eq!(entity.text_field("label"), Some("First"));
        // Reference-typed and null values are not scalars
        assert_eq!(entity.text_field("category"), None);
        assert_eq!(entity.text_field("empty"), None);
        // Missing keys are absent, not an error
        assert_eq!(entity.text_field("nope"), None);
    }

    #[test]
    fn test_column_text_system_columns() {
        let mut entity = Entity::new("skeleton", "First");
        entity.created_by = 7;
        entity.created_date = "2024-03-01T08:30:00Z".parse().unwrap();

        assert_eq!(entity.column_text("label").as_deref(), Some("First"));
        assert_eq!(entity.column_text("created_by").as_deref(), Some("7"));
        assert_eq!(
            entity.column_text("created_date").as_deref(),
            Some("2024-03-01 08:30:00")
        );
    }

    #[test]
    fn test_column_text_falls_back_to_fields() {
        let entity =
            Entity::new("skeleton", "First").with_field("city", FieldValue::Text("Bern".into()));
        assert_eq!(entity.column_text("city").as_deref(), Some("Bern"));
        assert_eq!(entity.column_text("unknown"), None);
    }
}
