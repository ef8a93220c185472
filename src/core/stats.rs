//! Daily statistics records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the shared statistics table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatRecord {
    /// Statistics series key (e.g. "skeleton-daily")
    pub stats_key: String,

    /// Series-specific payload
    pub data: serde_json::Value,

    /// When the record was written
    pub date: DateTime<Utc>,
}

/// Payload of a daily entity-count record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStats {
    /// Entities created today
    pub new: usize,

    /// Entities overall
    pub total: usize,
}
