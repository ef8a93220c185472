//! Typed error handling for entable
//!
//! Callers can match specific error categories instead of dealing with a
//! generic boxed error.
//!
//! # Error Categories
//!
//! - [`EntityError`]: entity fetch/save failures
//! - [`ConfigError`]: form configuration loading and lookup
//! - [`StorageError`]: storage backend failures
//! - [`ExportError`]: export serialization and file I/O
//!
//! Filter-map shape problems are deliberately not part of this taxonomy:
//! unrecognized filter keys are ignored, not raised (see
//! [`FilterMap::compile`](crate::core::query::FilterMap::compile)).

use std::path::PathBuf;
use thiserror::Error;

/// The umbrella error type for all entable operations
#[derive(Debug, Error)]
pub enum EntableError {
    /// Entity fetch/save errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Form configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export errors
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl EntableError {
    /// Stable code for programmatic handling at an API boundary
    pub fn error_code(&self) -> &'static str {
        match self {
            EntableError::Entity(e) => e.error_code(),
            EntableError::Config(_) => "CONFIG_ERROR",
            EntableError::Storage(_) => "STORAGE_ERROR",
            EntableError::Export(_) => "EXPORT_ERROR",
        }
    }
}

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// No row matched the requested id
    #[error("could not find {entity_type} with identifier {id}")]
    NotFound { entity_type: String, id: u64 },

    /// An update was requested for a row that no longer exists.
    ///
    /// Distinct from [`EntityError::NotFound`] so callers can tell a failed
    /// lookup apart from a save that raced a deletion.
    #[error("cannot update {entity_type} with identifier {id}; does not exist")]
    UpdateMissing { entity_type: String, id: u64 },
}

impl EntityError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::UpdateMissing { .. } => "ENTITY_UPDATE_MISSING",
        }
    }
}

/// Errors related to form configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested form is not registered
    #[error("unknown form '{0}'")]
    UnknownForm(String),

    /// Reading the configuration file failed
    #[error("failed to read form configuration from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file did not parse
    #[error("invalid form configuration")]
    Parse(#[from] serde_yaml::Error),
}

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A shared lock was poisoned by a panicking writer
    #[error("failed to acquire storage lock: {0}")]
    LockPoisoned(String),

    /// An update targeted a row that is not present in the store
    #[error("row {id} missing during update")]
    RowMissing { id: u64 },

    /// An insert carried a non-zero id
    #[error("cannot insert row that already has identifier {id}")]
    AlreadyPersisted { id: u64 },
}

/// Errors related to export generation
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the export artifact failed
    #[error("failed to write export file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the workbook failed
    #[error("failed to serialize workbook")]
    Serialize(#[from] serde_json::Error),
}
