//! Records store: typed load/save of whole record collections.
//!
//! A backend only has to read and write opaque blobs per [`Collection`];
//! the JSON encoding and the "missing means empty" rule live in the
//! provided methods of [`RecordStore`].

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::{FillUp, Vehicle};

/// A named, persisted record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// All vehicles.
    Vehicles,
    /// All fill-ups, across vehicles.
    FillUps,
}

impl Collection {
    /// Every collection, in load order.
    pub const ALL: [Collection; 2] = [Collection::Vehicles, Collection::FillUps];

    /// The storage key for this collection.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::FillUps => "fill_ups",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Persistence boundary for the two record collections.
///
/// Implementors supply blob I/O. Collections are always loaded and saved
/// whole.
pub trait RecordStore {
    /// Read the raw blob for a collection, `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read_blob(&self, collection: Collection) -> Result<Option<String>>;

    /// Replace the raw blob for a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write_blob(&mut self, collection: Collection, blob: String) -> Result<()>;

    /// Load all vehicles. An absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] if the stored blob is malformed.
    fn load_vehicles(&self) -> Result<Vec<Vehicle>> {
        load(self, Collection::Vehicles)
    }

    /// Load all fill-ups. An absent collection is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] if the stored blob is malformed.
    fn load_fill_ups(&self) -> Result<Vec<FillUp>> {
        load(self, Collection::FillUps)
    }

    /// Replace the stored vehicles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if serialization fails.
    fn save_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<()> {
        save(self, Collection::Vehicles, vehicles)
    }

    /// Replace the stored fill-ups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if serialization fails.
    fn save_fill_ups(&mut self, fill_ups: &[FillUp]) -> Result<()> {
        save(self, Collection::FillUps, fill_ups)
    }
}

fn load<T, S>(store: &S, collection: Collection) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let Some(blob) = store.read_blob(collection)? else {
        debug!("No stored {}, starting empty", collection);
        return Ok(Vec::new());
    };
    trace!("Decoding {} bytes of {}", blob.len(), collection);
    serde_json::from_str(&blob).map_err(|source| Error::Decoding { collection, source })
}

fn save<T, S>(store: &mut S, collection: Collection, records: &[T]) -> Result<()>
where
    T: Serialize + DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let blob =
        serde_json::to_string(records).map_err(|source| Error::Encoding { collection, source })?;
    // Non-finite floats encode as `null` and would not load back.
    serde_json::from_str::<Vec<T>>(&blob)
        .map_err(|source| Error::Encoding { collection, source })?;
    debug!("Saving {} {}", records.len(), collection);
    store.write_blob(collection, blob)
}

/// A records store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<Collection, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with a raw blob, bypassing encoding.
    #[must_use]
    pub fn with_blob(mut self, collection: Collection, blob: impl Into<String>) -> Self {
        self.blobs.insert(collection, blob.into());
        self
    }

    /// The raw blob currently stored for a collection.
    #[must_use]
    pub fn blob(&self, collection: Collection) -> Option<&str> {
        self.blobs.get(&collection).map(String::as_str)
    }
}

impl RecordStore for MemoryStore {
    fn read_blob(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.blobs.get(&collection).cloned())
    }

    fn write_blob(&mut self, collection: Collection, blob: String) -> Result<()> {
        self.blobs.insert(collection, blob);
        Ok(())
    }
}
