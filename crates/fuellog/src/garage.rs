//! The garage: in-memory record collections backed by a [`RecordStore`].
//!
//! Collections are loaded once when the garage is opened and saved whole
//! after every mutation. All edits address records by id.
//!
//! A collection that fails to decode on open is replaced by an empty one
//! (with a warning). A failed save is logged and the collection is marked
//! dirty; the in-memory records remain authoritative until [`Garage::flush`]
//! or a later mutation saves them successfully.

use chrono::TimeZone;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::model::{FillUp, FillUpId, Vehicle, VehicleId};
use crate::stats::{self, Summary};
use crate::store::{Collection, RecordStore};

/// Vehicles and fill-ups, kept in sync with a records store.
#[derive(Debug)]
pub struct Garage<S: RecordStore> {
    store: S,
    vehicles: Vec<Vehicle>,
    fill_ups: Vec<FillUp>,
    vehicles_dirty: bool,
    fill_ups_dirty: bool,
}

fn or_empty<T>(collection: Collection, loaded: Result<Vec<T>>) -> Result<Vec<T>> {
    match loaded {
        Ok(records) => Ok(records),
        Err(e) if e.is_decoding() => {
            warn!("Discarding unreadable {}: {}", collection, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

impl<S: RecordStore> Garage<S> {
    /// Load both collections from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. Malformed blobs are
    /// not an error; they load as empty collections.
    pub fn open(store: S) -> Result<Self> {
        let vehicles = or_empty(Collection::Vehicles, store.load_vehicles())?;
        let fill_ups = or_empty(Collection::FillUps, store.load_fill_ups())?;
        info!(
            "Loaded {} vehicles and {} fill-ups",
            vehicles.len(),
            fill_ups.len()
        );
        Ok(Self {
            store,
            vehicles,
            fill_ups,
            vehicles_dirty: false,
            fill_ups_dirty: false,
        })
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All vehicles, in insertion order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All fill-ups across vehicles, in insertion order.
    #[must_use]
    pub fn fill_ups(&self) -> &[FillUp] {
        &self.fill_ups
    }

    /// Look up a vehicle by id.
    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    /// Look up a fill-up by id.
    #[must_use]
    pub fn fill_up(&self, id: FillUpId) -> Option<&FillUp> {
        self.fill_ups.iter().find(|f| f.id() == id)
    }

    /// Fill-ups logged against one vehicle.
    #[must_use]
    pub fn fill_ups_for(&self, vehicle_id: VehicleId) -> Vec<FillUp> {
        stats::for_vehicle(&self.fill_ups, vehicle_id)
    }

    /// Add a vehicle and save the vehicle collection.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> VehicleId {
        let id = vehicle.id();
        debug!("Adding vehicle {}", id);
        self.vehicles.push(vehicle);
        self.persist(Collection::Vehicles);
        id
    }

    /// Replace the vehicle with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VehicleNotFound`] if no vehicle has that id.
    pub fn update_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        let id = vehicle.id();
        let slot = self
            .vehicles
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or(Error::VehicleNotFound(id))?;
        *slot = vehicle;
        debug!("Updated vehicle {}", id);
        self.persist(Collection::Vehicles);
        Ok(())
    }

    /// Remove a vehicle by id, returning it.
    ///
    /// Fill-ups referencing the vehicle are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VehicleNotFound`] if no vehicle has that id.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Result<Vehicle> {
        let index = self
            .vehicles
            .iter()
            .position(|v| v.id() == id)
            .ok_or(Error::VehicleNotFound(id))?;
        let removed = self.vehicles.remove(index);
        debug!("Removed vehicle {}", id);
        self.persist(Collection::Vehicles);
        Ok(removed)
    }

    /// Add a fill-up and save the fill-up collection.
    ///
    /// The referenced vehicle does not have to exist.
    pub fn add_fill_up(&mut self, fill_up: FillUp) -> FillUpId {
        let id = fill_up.id();
        if self.vehicle(fill_up.vehicle_id()).is_none() {
            warn!(
                "Fill-up {} references unknown vehicle {}",
                id,
                fill_up.vehicle_id()
            );
        }
        debug!("Adding fill-up {}", id);
        self.fill_ups.push(fill_up);
        self.persist(Collection::FillUps);
        id
    }

    /// Remove a fill-up by id, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FillUpNotFound`] if no fill-up has that id.
    pub fn remove_fill_up(&mut self, id: FillUpId) -> Result<FillUp> {
        let index = self
            .fill_ups
            .iter()
            .position(|f| f.id() == id)
            .ok_or(Error::FillUpNotFound(id))?;
        let removed = self.fill_ups.remove(index);
        debug!("Removed fill-up {}", id);
        self.persist(Collection::FillUps);
        Ok(removed)
    }

    /// Statistics over all fill-ups, or only those of one vehicle.
    #[must_use]
    pub fn summary<Tz: TimeZone>(&self, scope: Option<VehicleId>, tz: &Tz) -> Summary {
        match scope {
            Some(vehicle_id) => Summary::from_fill_ups(&self.fill_ups_for(vehicle_id), tz),
            None => Summary::from_fill_ups(&self.fill_ups, tz),
        }
    }

    /// Whether some collection has changes that failed to save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.vehicles_dirty || self.fill_ups_dirty
    }

    /// Retry saving every collection whose last save failed.
    ///
    /// # Errors
    ///
    /// Returns the first save error; the collection stays dirty.
    pub fn flush(&mut self) -> Result<()> {
        if self.vehicles_dirty {
            self.store.save_vehicles(&self.vehicles)?;
            self.vehicles_dirty = false;
        }
        if self.fill_ups_dirty {
            self.store.save_fill_ups(&self.fill_ups)?;
            self.fill_ups_dirty = false;
        }
        Ok(())
    }

    fn persist(&mut self, collection: Collection) {
        let result = match collection {
            Collection::Vehicles => self.store.save_vehicles(&self.vehicles),
            Collection::FillUps => self.store.save_fill_ups(&self.fill_ups),
        };
        let failed = match result {
            Ok(()) => false,
            Err(e) => {
                error!("Failed to save {}: {}", collection, e);
                true
            }
        };
        match collection {
            Collection::Vehicles => self.vehicles_dirty = failed,
            Collection::FillUps => self.fill_ups_dirty = failed,
        }
    }
}
