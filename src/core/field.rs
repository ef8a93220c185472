//! Field descriptors and dynamic field values

use serde::{Deserialize, Serialize};

/// A stored dynamic field value attached to an entity.
///
/// Scalars carry their raw text representation (dates, currency amounts and
/// URLs are all stored as text, the way the backing table stores them).
/// Select and multiselect fields store tag references that are resolved
/// lazily through a [`TagStore`](crate::storage::TagStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// Raw scalar value (text, url, date, currency, ...)
    Text(String),

    /// Reference to a single tag (select field)
    Tag(u64),

    /// References to a set of tags (multiselect field)
    Tags(Vec<u64>),

    /// Explicitly unset
    Null,
}

impl FieldValue {
    /// Get the value as a scalar string if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a single tag reference if possible
    pub fn as_tag(&self) -> Option<u64> {
        match self {
            FieldValue::Tag(id) => Some(*id),
            _ => None,
        }
    }

    /// Get the value as a tag reference set if possible
    pub fn as_tags(&self) -> Option<&[u64]> {
        match self {
            FieldValue::Tags(ids) => Some(ids),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// The type of a dynamic field.
///
/// This is a closed set: form configuration dispatches on it for both input
/// rendering and export formatting. Types this crate does not know about
/// deserialize to [`FieldType::Unknown`] and render as blank cells on
/// export, never as an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum FieldType {
    Text,
    Url,
    Date,
    Datetime,
    Time,
    Currency,
    ReadonlyCurrency,
    Select,
    Multiselect,
    /// View partial rendered by the form layer; carries no exportable value
    Partial,
    /// Catch-all for field types introduced by other modules
    Unknown,
}

impl From<String> for FieldType {
    fn from(wire: String) -> Self {
        match wire.as_str() {
            "text" => FieldType::Text,
            "url" => FieldType::Url,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "time" => FieldType::Time,
            "currency" => FieldType::Currency,
            "readonly-currency" => FieldType::ReadonlyCurrency,
            "select" => FieldType::Select,
            "multiselect" => FieldType::Multiselect,
            "partial" => FieldType::Partial,
            _ => FieldType::Unknown,
        }
    }
}

impl FieldType {
    /// The wire name used in form configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Url => "url",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Time => "time",
            FieldType::Currency => "currency",
            FieldType::ReadonlyCurrency => "readonly-currency",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Partial => "partial",
            FieldType::Unknown => "unknown",
        }
    }
}

/// Metadata for one dynamic field of a form.
///
/// The ordered descriptor list of a form defines both the input-form layout
/// and the export column order, one-to-one, left-to-right.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    /// Storage key of the field (e.g. "featuredimage")
    pub key: String,

    /// Human-readable label, used as the export column header
    pub label: String,

    /// Field type driving input rendering and export formatting
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    /// Create a new field descriptor
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_text() {
        let value = FieldValue::Text("hello".to_string());
        assert_eq!(value.as_text(), Some("hello"));
        assert_eq!(value.as_tag(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_tag() {
        let value = FieldValue::Tag(7);
        assert_eq!(value.as_tag(), Some(7));
        assert_eq!(value.as_text(), None);
    }

    #[test]
    fn test_field_value_tags() {
        let value = FieldValue::Tags(vec![1, 2, 3]);
        assert_eq!(value.as_tags(), Some(&[1u64, 2, 3][..]));
        assert_eq!(value.as_tag(), None);
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.as_text(), None);
    }

    #[test]
    fn test_field_type_wire_names() {
        let ty: FieldType = serde_yaml::from_str("readonly-currency").unwrap();
        assert_eq!(ty, FieldType::ReadonlyCurrency);

        let ty: FieldType = serde_yaml::from_str("multiselect").unwrap();
        assert_eq!(ty, FieldType::Multiselect);
    }

    #[test]
    fn test_field_type_unknown_fallback() {
        // Types from newer modules must not fail deserialization
        let ty: FieldType = serde_yaml::from_str("hexcolor").unwrap();
        assert_eq!(ty, FieldType::Unknown);
    }

    #[test]
    fn test_descriptor_yaml_roundtrip() {
        let desc = FieldDescriptor::new("price", "Price", FieldType::Currency);
        let yaml = serde_yaml::to_string(&desc).unwrap();
        let restored: FieldDescriptor = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(desc, restored);
    }
}
