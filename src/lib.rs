//! # entable
//!
//! Schema-flexible entity tables with typed dynamic fields, filtered
//! pagination, and tabular export.
//!
//! An entity row carries a fixed set of system columns (identity, label,
//! audit fields) plus an open-ended map of typed dynamic fields defined by
//! form configuration. The crate covers the data path around those rows:
//!
//! - **Dynamic field model**: field descriptors (key, label, type) loaded
//!   per form, with capability traits for scalar, single-reference and
//!   multi-reference access on every entity
//! - **Query & pagination**: generic filter maps compiled into prefix and
//!   tag-join predicates, executed eagerly or through a lazy paginator
//! - **Persistence**: audit-stamped saves with an explicit actor context
//!   and atomic tag-link synchronization
//! - **Tabular export**: a type-aware cell renderer producing a styled,
//!   auto-sized workbook written to a unique per-export path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use entable::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let table = EntityTable::new(store.clone(), "skeleton-single");
//!
//! // Save a new entity; audit fields come from the actor, not the caller
//! let mut entity = table.generate_new();
//! entity.label = "First".to_string();
//! let id = table.save_single(&entity, &ActorContext::new(1)).await?;
//!
//! // Prefix filtering and pagination
//! let filters = FilterMap::new().with("label-like", "Fir");
//! let page = table
//!     .fetch_paginated(&filters, Some(OrderBy::asc("label")))
//!     .page(1)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        actor::ActorContext,
        entity::{Entity, MultiReferenceField, ReferenceField, ScalarField},
        error::{ConfigError, EntableError, EntityError, ExportError, StorageError},
        field::{FieldDescriptor, FieldType, FieldValue},
        query::{Direction, FilterMap, OrderBy, Page, PaginationMeta},
        stats::{DailyStats, StatRecord},
        table::{EntityTable, Paginator},
        tag::{Tag, TagLink, TagSelection},
    };

    // === Config ===
    pub use crate::config::FormRegistry;

    // === Storage ===
    pub use crate::storage::{EntityStore, InMemoryStore, StatsStore, TagStore};

    // === Export ===
    pub use crate::export::{DownloadLink, Exporter, Workbook, Worksheet};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
