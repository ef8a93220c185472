//! Core domain model: entities, fields, tags, queries, errors

pub mod actor;
pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod stats;
pub mod table;
pub mod tag;

pub use actor::ActorContext;
pub use entity::{Entity, MultiReferenceField, ReferenceField, ScalarField};
pub use error::{ConfigError, EntableError, EntityError, ExportError, StorageError};
pub use field::{FieldDescriptor, FieldType, FieldValue};
pub use query::{Direction, FilterMap, OrderBy, Page, PaginationMeta, Predicate, Selection};
pub use stats::{DailyStats, StatRecord};
pub use table::{EntityTable, Paginator};
pub use tag::{Tag, TagLink, TagSelection};
