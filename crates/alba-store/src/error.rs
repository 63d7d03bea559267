use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A value handed to the store breaks an entity invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Write-back to durable storage failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A slot write would exceed the storage quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot payload could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl StoreError {
    pub fn tea_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Tea",
            id: id.to_string(),
        }
    }
}

/// A durable write failed. The in-memory state it describes is still in
/// effect for the current session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to persist slot '{slot}': {reason}")]
pub struct PersistenceError {
    pub slot: String,
    pub reason: String,
}

impl PersistenceError {
    pub fn new(slot: impl Into<String>, cause: &StoreError) -> Self {
        Self {
            slot: slot.into(),
            reason: cause.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
