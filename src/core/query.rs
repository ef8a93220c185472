//! Filter compilation, ordering, and pagination types
//!
//! The query engine turns a generic filter map into a list of predicates the
//! storage backend executes. Filter keys follow the form-filter convention:
//! a `-like` suffix requests a prefix match on the named column, the
//! reserved `multi_tag` key requests a join against the tag-relation side
//! table, and anything else is silently ignored. That last rule is a
//! deliberate, preserved behavior: plain keys are *not* equality filters.

use crate::core::entity::Entity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Filter key suffix requesting a prefix match on the base column
pub const LIKE_SUFFIX: &str = "-like";

/// Reserved filter key requesting a tag-relation join
pub const MULTI_TAG_KEY: &str = "multi_tag";

/// A generic filter map: filter-key to raw value, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMap(IndexMap<String, String>);

impl FilterMap {
    /// Create an empty filter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter entry, replacing any existing one for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`FilterMap::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Check whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compile the map into storage predicates.
    ///
    /// All predicates AND together; there is no OR and no grouping.
    /// Unrecognized keys without the `-like` suffix are dropped with a debug
    /// log entry, and a `multi_tag` value that is not a number is dropped
    /// with a warning. Neither is an error.
    pub fn compile(&self, entity_type_prefix: &str) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        for (key, value) in &self.0 {
            if key == MULTI_TAG_KEY {
                match value.parse::<u64>() {
                    Ok(tag_id) => predicates.push(Predicate::TagJoin {
                        tag_id,
                        entity_type_prefix: entity_type_prefix.to_string(),
                    }),
                    Err(_) => warn!(%value, "multi_tag filter value is not a tag id, dropping"),
                }
            } else if let Some(column) = key.strip_suffix(LIKE_SUFFIX) {
                predicates.push(Predicate::Prefix {
                    column: column.to_string(),
                    value: value.clone(),
                });
            } else {
                debug!(%key, "ignoring unrecognized filter key");
            }
        }
        predicates
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One compiled filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column text starts with the given value
    Prefix { column: String, value: String },

    /// Entity has a tag-relation row with this tag id whose stored entity
    /// type starts with the given prefix
    TagJoin {
        tag_id: u64,
        entity_type_prefix: String,
    },
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Caller-supplied ordering, parsed from a SQL-style `"column direction"`
/// string.
///
/// The column name is trusted caller input; it is not validated against the
/// form's descriptor list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Order by a column ascending
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Order by a column descending
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse `"label ASC"` / `"created_date desc"` / `"label"`.
    ///
    /// Returns `None` for an empty string. A missing or unrecognized
    /// direction falls back to ascending.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let column = parts.next()?;
        let direction = match parts.next() {
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            _ => Direction::Asc,
        };
        Some(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// Compare two entities under this ordering, tie-breaking by id so the
    /// result is stable across repeated queries.
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        let ord = match (self.column_key(a), self.column_key(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        ord.then(a.id.cmp(&b.id))
    }

    fn column_key(&self, entity: &Entity) -> Option<String> {
        entity.column_text(&self.column)
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::asc("label")
    }
}

/// A compiled selection over the entity table: ANDed predicates plus an
/// optional ordering, executed by the storage backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub predicates: Vec<Predicate>,
    pub order: Option<OrderBy>,
}

impl Selection {
    /// Create a selection
    pub fn new(predicates: Vec<Predicate>, order: Option<OrderBy>) -> Self {
        Self { predicates, order }
    }
}

/// One page of results with pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The page's rows
    pub items: Vec<T>,

    /// Pagination metadata
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub per_page: usize,

    /// Total number of items after filters
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Compute metadata for a page request
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };
        let start = (page - 1) * per_page;

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: start + per_page < total,
            has_prev: page > 1,
        }
    }
}
