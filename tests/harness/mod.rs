//! Shared test harness for integration tests
//!
//! Provides a seeded in-memory store, a form registry matching the
//! `skeleton-single` form used throughout the tests, and helpers for
//! building entities with dynamic field values.

#![allow(dead_code)]

use entable::prelude::*;
use std::sync::Arc;

/// The form name every harness table is bound to
pub const FORM: &str = "skeleton-single";

/// A registry holding the `skeleton-single` form with one field per
/// exportable type
pub fn registry() -> FormRegistry {
    let mut registry = FormRegistry::new();
    registry.register(
        FORM,
        vec![
            FieldDescriptor::new("label", "Name", FieldType::Text),
            FieldDescriptor::new("website", "Website", FieldType::Url),
            FieldDescriptor::new("founded", "Founded", FieldType::Date),
            FieldDescriptor::new("last_seen", "Last Seen", FieldType::Datetime),
            FieldDescriptor::new("price", "Price", FieldType::Currency),
            FieldDescriptor::new("category", "Category", FieldType::Select),
            FieldDescriptor::new("labels", "Labels", FieldType::Multiselect),
            FieldDescriptor::new("gallery", "Gallery", FieldType::Partial),
        ],
    );
    registry
}

/// A fresh store plus a table bound to [`FORM`]
pub fn store_and_table() -> (InMemoryStore, EntityTable) {
    let store = InMemoryStore::new();
    let table = EntityTable::new(Arc::new(store.clone()), FORM);
    (store, table)
}

/// Seed the tags the harness entities reference
pub async fn seed_tags(store: &InMemoryStore) {
    for tag in [
        Tag::new(1, "Hardware"),
        Tag::new(2, "Software"),
        Tag::with_value(3, "Red", "#ff0000"),
        Tag::new(4, "Blue"),
    ] {
        store.upsert_tag(tag).await.expect("tag seeding");
    }
}

/// Build an unsaved entity with a full set of scalar fields
pub fn sample_entity(table: &EntityTable, label: &str) -> Entity {
    let mut entity = table.generate_new();
    entity.label = label.to_string();
    entity.set_field(
        "website",
        FieldValue::Text("https://example.com".to_string()),
    );
    entity.set_field("founded", FieldValue::Text("2024-03-01".to_string()));
    entity.set_field(
        "last_seen",
        FieldValue::Text("2024-03-01 13:45:10".to_string()),
    );
    entity.set_field("price", FieldValue::Text("1234.5".to_string()));
    entity.set_field("category", FieldValue::Tag(1));
    entity
}
