//! Error types for fuellog.
//!
//! This module defines the error types used by the records store, the
//! storage engine, configuration loading and the garage. The statistics
//! engine is total over its inputs and has no error type of its own.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::{FillUpId, VehicleId};
use crate::store::Collection;

/// The main error type for fuellog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Persistence Errors ===
    /// A collection could not be serialized for saving.
    #[error("failed to encode {collection}: {source}")]
    Encoding {
        /// The collection being saved.
        collection: Collection,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored collection blob could not be deserialized.
    #[error("failed to decode {collection}: {source}")]
    Decoding {
        /// The collection being loaded.
        collection: Collection,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization for output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// No vehicle with the given id exists.
    #[error("vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    /// No fill-up with the given id exists.
    #[error("fill-up not found: {0}")]
    FillUpNotFound(FillUpId),

    /// User-supplied input could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fuellog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from decoding a stored collection.
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. })
    }

    /// Check if this error came from encoding a collection.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Check if this error means a record lookup by id failed.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VehicleNotFound(_) | Self::FillUpNotFound(_))
    }
}
