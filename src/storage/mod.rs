//! Storage contracts and backends
//!
//! The query engine compiles filters into a [`Selection`]; backends execute
//! it. Three narrow traits cover the three kinds of shared state: entity
//! rows, the tag-relation side table, and the daily statistics table.

mod memory;

pub use memory::InMemoryStore;

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::query::Selection;
use crate::core::stats::StatRecord;
use crate::core::tag::{Tag, TagLink, TagSelection};
use async_trait::async_trait;

/// Relational-style access to the entity table
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert an unsaved entity and return its assigned id.
    ///
    /// The entity's id must be 0; identity is assigned exactly once.
    async fn insert(&self, entity: Entity) -> Result<u64, StorageError>;

    /// Update an existing entity row in place
    async fn update(&self, entity: Entity) -> Result<(), StorageError>;

    /// Fetch one row by id
    async fn get(&self, id: u64) -> Result<Option<Entity>, StorageError>;

    /// Execute a selection eagerly and return all matching rows in order
    async fn select(&self, selection: &Selection) -> Result<Vec<Entity>, StorageError>;

    /// Count the rows a selection matches
    async fn count(&self, selection: &Selection) -> Result<usize, StorageError>;

    /// Execute a selection with LIMIT/OFFSET semantics
    async fn select_page(
        &self,
        selection: &Selection,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Entity>, StorageError>;

    /// Save an entity and synchronize its multiselect tag links as one
    /// atomic operation.
    ///
    /// Inserts when the id is 0, updates otherwise. Either the row write and
    /// every link replacement take effect together or none do; no partial
    /// state where scalars are updated but links are stale.
    async fn save_with_tags(
        &self,
        entity: Entity,
        tags: &[TagSelection],
    ) -> Result<u64, StorageError>;
}

/// Access to tags and the shared tag-relation side table
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Fetch a tag by id; `None` for a dangling reference
    async fn tag(&self, id: u64) -> Result<Option<Tag>, StorageError>;

    /// Insert or replace a tag
    async fn upsert_tag(&self, tag: Tag) -> Result<(), StorageError>;

    /// All association rows for one entity and field key
    async fn links_for(
        &self,
        entity_id: u64,
        entity_type: &str,
        field_key: &str,
    ) -> Result<Vec<TagLink>, StorageError>;

    /// Replace the association set for one entity and field key
    async fn replace_links(
        &self,
        entity_id: u64,
        entity_type: &str,
        selection: &TagSelection,
    ) -> Result<(), StorageError>;
}

/// Append-style access to the shared statistics table
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Append one statistics record
    async fn insert_stat(&self, record: StatRecord) -> Result<(), StorageError>;

    /// All records written under a statistics key, oldest first
    async fn stats_for_key(&self, stats_key: &str) -> Result<Vec<StatRecord>, StorageError>;
}
