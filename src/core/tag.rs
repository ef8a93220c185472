//! Tags and the shared tag-relation side table

use serde::{Deserialize, Serialize};

/// A reusable labeled reference usable as a select/multiselect value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique tag identifier
    pub id: u64,

    /// Display label
    pub label: String,

    /// Optional raw value; export prefers this over the label when present
    pub value: Option<String>,
}

impl Tag {
    /// Create a new tag
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: None,
        }
    }

    /// Create a new tag carrying a raw value
    pub fn with_value(id: u64, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: Some(value.into()),
        }
    }

    /// The value exports should display: raw value when present, label otherwise
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// One row of the tag-relation side table.
///
/// A single physical table serves every entity kind: `entity_type` carries
/// the kind discriminator, so two modules can both link entity id 5 to tags
/// without colliding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagLink {
    /// The linked entity's id
    pub entity_id: u64,

    /// Entity kind discriminator (e.g. "skeleton")
    pub entity_type: String,

    /// The multiselect field this association belongs to
    pub field_key: String,

    /// The linked tag's id
    pub tag_id: u64,
}

/// The desired tag set for one multiselect field, used when saving an entity
/// together with its tag links.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSelection {
    /// Multiselect field key
    pub field_key: String,

    /// Full replacement set of tag ids for that field
    pub tag_ids: Vec<u64>,
}

impl TagSelection {
    /// Create a new tag selection
    pub fn new(field_key: impl Into<String>, tag_ids: Vec<u64>) -> Self {
        Self {
            field_key: field_key.into(),
            tag_ids,
        }
    }
}
