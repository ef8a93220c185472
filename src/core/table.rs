//! Entity table service: filtered fetches, pagination, saves, daily stats
//!
//! [`EntityTable`] is the one consumer-facing persistence surface. It owns
//! the form name of its module (e.g. `skeleton-single`), derives the entity
//! type prefix from it, compiles filter maps through the query engine, and
//! translates storage results into the entity error taxonomy.

use crate::core::actor::ActorContext;
use crate::core::entity::Entity;
use crate::core::error::{EntableError, EntityError};
use crate::core::query::{FilterMap, OrderBy, Page, PaginationMeta, Selection};
use crate::core::stats::{DailyStats, StatRecord};
use crate::core::tag::TagSelection;
use crate::storage::{EntityStore, StatsStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Default page size for paginated fetches
pub const DEFAULT_PER_PAGE: usize = 20;

/// Persistence and query service for one entity module
#[derive(Clone)]
pub struct EntityTable {
    store: Arc<dyn EntityStore>,
    form_name: String,
}

impl EntityTable {
    /// Create a table bound to a storage backend and a single-form name
    /// (e.g. `skeleton-single`)
    pub fn new(store: Arc<dyn EntityStore>, form_name: impl Into<String>) -> Self {
        Self {
            store,
            form_name: form_name.into(),
        }
    }

    /// The module's single-form name
    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    /// The entity type prefix: text before the first `-` of the form name.
    ///
    /// This is the discriminator stored in the shared tag-relation table,
    /// which is how one physical side table serves multiple entity kinds.
    pub fn entity_type(&self) -> &str {
        self.form_name
            .split('-')
            .next()
            .unwrap_or(&self.form_name)
    }

    /// Create a new unsaved entity of this table's kind
    pub fn generate_new(&self) -> Entity {
        Entity::new(self.entity_type(), "")
    }

    fn selection(&self, filters: &FilterMap, order: Option<OrderBy>) -> Selection {
        let predicates = filters.compile(self.entity_type());
        debug!(
            entity_type = self.entity_type(),
            predicates = predicates.len(),
            "compiled filter map"
        );
        Selection::new(predicates, order)
    }

    /// Fetch all matching entities eagerly, in the given order.
    ///
    /// Returned rows are fully hydrated: scalar field access needs no
    /// further round trip. Select/multiselect values resolve lazily through
    /// the accessor traits.
    pub async fn fetch_all(
        &self,
        filters: &FilterMap,
        order: Option<OrderBy>,
    ) -> Result<Vec<Entity>, EntableError> {
        Ok(self.store.select(&self.selection(filters, order)).await?)
    }

    /// Build a lazy paginator over the matching entities.
    ///
    /// Nothing is executed until [`Paginator::page`] is called; each page
    /// request issues one count query and one page query.
    pub fn fetch_paginated(&self, filters: &FilterMap, order: Option<OrderBy>) -> Paginator {
        Paginator {
            store: Arc::clone(&self.store),
            selection: self.selection(filters, order),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Fetch one entity by id.
    ///
    /// A missing row is always [`EntityError::NotFound`], never a silent
    /// absent value.
    pub async fn get_single(&self, id: u64) -> Result<Entity, EntableError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| {
                EntityError::NotFound {
                    entity_type: self.entity_type().to_string(),
                    id,
                }
                .into()
            })
    }

    /// Save an entity and return its id.
    ///
    /// An unsaved entity (id 0) gets all four audit fields stamped from the
    /// actor and the server clock, with `created_*` equal to `modified_*`,
    /// then inserts. An existing entity is verified first — a vanished row
    /// surfaces as [`EntityError::UpdateMissing`] — and only the
    /// `modified_*` pair is re-stamped; `created_*` is taken from the stored
    /// row, never from the caller.
    pub async fn save_single(
        &self,
        entity: &Entity,
        actor: &ActorContext,
    ) -> Result<u64, EntableError> {
        let row = self.stamped_for_save(entity, actor).await?;
        let id = if row.id == 0 {
            self.store.insert(row).await?
        } else {
            let id = row.id;
            self.store.update(row).await?;
            id
        };
        info!(entity_type = self.entity_type(), id, "saved entity");
        Ok(id)
    }

    /// Save an entity and synchronize its multiselect tag links in one
    /// atomic storage operation.
    ///
    /// Unlike a save followed by a separate link update, a failure here
    /// leaves neither the scalar columns nor the tag relations half-written.
    pub async fn save_single_with_tags(
        &self,
        entity: &Entity,
        tags: &[TagSelection],
        actor: &ActorContext,
    ) -> Result<u64, EntableError> {
        let row = self.stamped_for_save(entity, actor).await?;
        let id = self.store.save_with_tags(row, tags).await?;
        info!(
            entity_type = self.entity_type(),
            id,
            fields = tags.len(),
            "saved entity with tag links"
        );
        Ok(id)
    }

    async fn stamped_for_save(
        &self,
        entity: &Entity,
        actor: &ActorContext,
    ) -> Result<Entity, EntableError> {
        let mut row = entity.clone();
        let now = Utc::now();
        if row.id == 0 {
            row.created_by = actor.user_id;
            row.created_date = now;
        } else {
            let existing =
                self.store
                    .get(row.id)
                    .await?
                    .ok_or_else(|| EntityError::UpdateMissing {
                        entity_type: self.entity_type().to_string(),
                        id: row.id,
                    })?;
            row.created_by = existing.created_by;
            row.created_date = existing.created_date;
        }
        row.modified_by = actor.user_id;
        row.modified_date = now;
        Ok(row)
    }

    /// Write today's entity counts into the statistics table.
    ///
    /// `new` reuses the prefix filter on `created_date` with today's date,
    /// `total` is an unfiltered count. The record lands under the key
    /// `<entity_type>-daily` with a `{new, total}` JSON payload.
    pub async fn generate_daily_stats(
        &self,
        stats: &dyn StatsStore,
    ) -> Result<DailyStats, EntableError> {
        let total = self.fetch_all(&FilterMap::new(), None).await?.len();
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let new = self
            .fetch_all(&FilterMap::new().with("created_date-like", today), None)
            .await?
            .len();

        let daily = DailyStats { new, total };
        stats
            .insert_stat(StatRecord {
                stats_key: format!("{}-daily", self.entity_type()),
                data: serde_json::to_value(daily).unwrap_or_default(),
                date: Utc::now(),
            })
            .await?;
        info!(
            entity_type = self.entity_type(),
            new, total, "generated daily stats"
        );
        Ok(daily)
    }
}

/// A lazy paginated view over a selection.
///
/// Holds the compiled selection; every [`Paginator::page`] call issues one
/// count query and one LIMIT/OFFSET query against the store. Page numbers
/// below 1 are clamped to the first page.
pub struct Paginator {
    store: Arc<dyn EntityStore>,
    selection: Selection,
    per_page: usize,
}

impl Paginator {
    /// Set the number of items per page (minimum 1)
    pub fn set_item_count_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
    }

    /// Builder-style variant of [`Paginator::set_item_count_per_page`]
    pub fn with_item_count_per_page(mut self, per_page: usize) -> Self {
        self.set_item_count_per_page(per_page);
        self
    }

    /// Fetch one page of results
    pub async fn page(&self, page: usize) -> Result<Page<Entity>, EntableError> {
        let page = page.max(1);
        let total = self.store.count(&self.selection).await?;
        let offset = (page - 1) * self.per_page;
        let items = self
            .store
            .select_page(&self.selection, self.per_page, offset)
            .await?;
        Ok(Page {
            items,
            meta: PaginationMeta::new(page, self.per_page, total),
        })
    }
}
