//! In-memory storage backend for testing and development
//!
//! All three storage contracts share one `RwLock`-guarded state, which is
//! what makes the atomic save-plus-link-sync possible: one write guard
//! covers the row write and every link replacement.

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::query::{Predicate, Selection};
use crate::core::stats::StatRecord;
use crate::core::tag::{Tag, TagLink, TagSelection};
use crate::storage::{EntityStore, StatsStore, TagStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Inner {
    entities: HashMap<u64, Entity>,
    next_id: u64,
    tags: HashMap<u64, Tag>,
    tag_links: Vec<TagLink>,
    stats: Vec<StatRecord>,
}

impl Inner {
    fn matches(&self, entity: &Entity, predicates: &[Predicate]) -> bool {
        predicates.iter().all(|predicate| match predicate {
            Predicate::Prefix { column, value } => entity
                .column_text(column)
                .is_some_and(|text| text.starts_with(value.as_str())),
            Predicate::TagJoin {
                tag_id,
                entity_type_prefix,
            } => self.tag_links.iter().any(|link| {
                link.entity_id == entity.id
                    && link.tag_id == *tag_id
                    && link.entity_type.starts_with(entity_type_prefix.as_str())
            }),
        })
    }

    fn select(&self, selection: &Selection) -> Vec<Entity> {
        let mut rows: Vec<Entity> = self
            .entities
            .values()
            .filter(|entity| self.matches(entity, &selection.predicates))
            .cloned()
            .collect();
        match &selection.order {
            Some(order) => rows.sort_by(|a, b| order.compare(a, b)),
            // HashMap iteration order is arbitrary; fall back to id order
            // so repeated queries are deterministic.
            None => rows.sort_by_key(|entity| entity.id),
        }
        rows
    }

    fn insert(&mut self, mut entity: Entity) -> Result<u64, StorageError> {
        if entity.id != 0 {
            return Err(StorageError::AlreadyPersisted { id: entity.id });
        }
        self.next_id += 1;
        entity.id = self.next_id;
        let id = entity.id;
        self.entities.insert(id, entity);
        Ok(id)
    }

    fn update(&mut self, entity: Entity) -> Result<(), StorageError> {
        if !self.entities.contains_key(&entity.id) {
            return Err(StorageError::RowMissing { id: entity.id });
        }
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    fn replace_links(&mut self, entity_id: u64, entity_type: &str, selection: &TagSelection) {
        self.tag_links.retain(|link| {
            !(link.entity_id == entity_id
                && link.entity_type == entity_type
                && link.field_key == selection.field_key)
        });
        for tag_id in &selection.tag_ids {
            self.tag_links.push(TagLink {
                entity_id,
                entity_type: entity_type.to_string(),
                field_key: selection.field_key.clone(),
                tag_id: *tag_id,
            });
        }
    }
}

/// In-memory implementation of all three storage contracts.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn insert(&self, entity: Entity) -> Result<u64, StorageError> {
        self.write()?.insert(entity)
    }

    async fn update(&self, entity: Entity) -> Result<(), StorageError> {
        self.write()?.update(entity)
    }

    async fn get(&self, id: u64) -> Result<Option<Entity>, StorageError> {
        Ok(self.read()?.entities.get(&id).cloned())
    }

    async fn select(&self, selection: &Selection) -> Result<Vec<Entity>, StorageError> {
        Ok(self.read()?.select(selection))
    }

    async fn count(&self, selection: &Selection) -> Result<usize, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .entities
            .values()
            .filter(|entity| inner.matches(entity, &selection.predicates))
            .count())
    }

    async fn select_page(
        &self,
        selection: &Selection,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Entity>, StorageError> {
        let rows = self.read()?.select(selection);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn save_with_tags(
        &self,
        entity: Entity,
        tags: &[TagSelection],
    ) -> Result<u64, StorageError> {
        let mut inner = self.write()?;
        let entity_type = entity.entity_type.clone();
        let id = if entity.id == 0 {
            inner.insert(entity)?
        } else {
            let id = entity.id;
            inner.update(entity)?;
            id
        };
        for selection in tags {
            inner.replace_links(id, &entity_type, selection);
        }
        Ok(id)
    }
}

#[async_trait]
impl TagStore for InMemoryStore {
    async fn tag(&self, id: u64) -> Result<Option<Tag>, StorageError> {
        Ok(self.read()?.tags.get(&id).cloned())
    }

    async fn upsert_tag(&self, tag: Tag) -> Result<(), StorageError> {
        self.write()?.tags.insert(tag.id, tag);
        Ok(())
    }

    async fn links_for(
        &self,
        entity_id: u64,
        entity_type: &str,
        field_key: &str,
    ) -> Result<Vec<TagLink>, StorageError> {
        Ok(self
            .read()?
            .tag_links
            .iter()
            .filter(|link| {
                link.entity_id == entity_id
                    && link.entity_type == entity_type
                    && link.field_key == field_key
            })
            .cloned()
            .collect())
    }

    async fn replace_links(
        &self,
        entity_id: u64,
        entity_type: &str,
        selection: &TagSelection,
    ) -> Result<(), StorageError> {
        self.write()?
            .replace_links(entity_id, entity_type, selection);
        Ok(())
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn insert_stat(&self, record: StatRecord) -> Result<(), StorageError> {
        self.write()?.stats.push(record);
        Ok(())
    }

    async fn stats_for_key(&self, stats_key: &str) -> Result<Vec<StatRecord>, StorageError> {
        Ok(self
            .read()?
            .stats
            .iter()
            .filter(|record| record.stats_key == stats_key)
            .cloned()
            .collect())
    }
}
