//! Actor context for audit stamping
//!
//! Persistence calls that stamp audit fields take an explicit actor value
//! instead of reading ambient session state. The caller (request handler,
//! job runner, migration script) decides who the actor is.

use serde::{Deserialize, Serialize};

/// The acting user for one persistence operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorContext {
    /// Numeric user id stamped into `created_by` / `modified_by`
    pub user_id: u64,
}

impl ActorContext {
    /// Create an actor context for a specific user
    pub fn new(user_id: u64) -> Self {
        Self { user_id }
    }

    /// Actor for unattended operations (scheduled stats, migrations)
    pub fn system() -> Self {
        Self { user_id: 0 }
    }
}
