//! Core record types for fuellog.
//!
//! This module defines the two persisted record kinds: vehicles and the
//! fill-ups logged against them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| Error::invalid_input(format!("invalid {} id '{s}': {e}", $label)))
            }
        }
    };
}

record_id!(
    /// Opaque unique identifier of a [`Vehicle`].
    VehicleId,
    "vehicle"
);

record_id!(
    /// Opaque unique identifier of a [`FillUp`].
    FillUpId,
    "fill-up"
);

/// A vehicle in the logbook.
///
/// The id is fixed at creation. Every other field is public; an edit is
/// expressed by cloning the record, changing fields and handing the whole
/// record back to [`crate::Garage::update_vehicle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    /// Display name chosen by the user.
    pub name: String,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year. Free-form, not validated as a number.
    pub year: String,
    /// Stated city consumption in L/100km.
    #[serde(default)]
    pub consumption_city: f64,
    /// Stated highway consumption in L/100km.
    #[serde(default)]
    pub consumption_highway: f64,
    /// Stated mixed consumption in L/100km.
    #[serde(default)]
    pub consumption_mixed: f64,
}

impl Vehicle {
    /// Create a vehicle with a fresh id and no stated consumption.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id: VehicleId::new(),
            name: name.into(),
            make: make.into(),
            model: model.into(),
            year: year.into(),
            consumption_city: 0.0,
            consumption_highway: 0.0,
            consumption_mixed: 0.0,
        }
    }

    /// Set the manufacturer-stated consumption figures.
    #[must_use]
    pub fn with_consumption(mut self, city: f64, highway: f64, mixed: f64) -> Self {
        self.consumption_city = city;
        self.consumption_highway = highway;
        self.consumption_mixed = mixed;
        self
    }

    /// The vehicle's id.
    #[must_use]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Stated average consumption.
    ///
    /// The mixed figure when it is set, otherwise the mean of city and
    /// highway.
    #[must_use]
    pub fn average_consumption(&self) -> f64 {
        if self.consumption_mixed > 0.0 {
            self.consumption_mixed
        } else {
            (self.consumption_city + self.consumption_highway) / 2.0
        }
    }
}

fn default_full_tank() -> bool {
    true
}

/// One fueling event.
///
/// Fields are read-only after construction. `total_cost` is computed once
/// in [`FillUp::new`] and stored; records loaded from storage keep the
/// stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillUp {
    id: FillUpId,
    vehicle_id: VehicleId,
    date: DateTime<Utc>,
    odometer: f64,
    volume: f64,
    price_per_liter: f64,
    total_cost: f64,
    #[serde(default = "default_full_tank")]
    is_full_tank: bool,
    #[serde(default)]
    real_consumption: f64,
}

impl FillUp {
    /// Create a full-tank fill-up with a fresh id.
    #[must_use]
    pub fn new(
        vehicle_id: VehicleId,
        date: DateTime<Utc>,
        odometer: f64,
        volume: f64,
        price_per_liter: f64,
    ) -> Self {
        Self {
            id: FillUpId::new(),
            vehicle_id,
            date,
            odometer,
            volume,
            price_per_liter,
            total_cost: volume * price_per_liter,
            is_full_tank: true,
            real_consumption: 0.0,
        }
    }

    /// Mark whether the tank was filled completely.
    #[must_use]
    pub fn with_full_tank(mut self, is_full_tank: bool) -> Self {
        self.is_full_tank = is_full_tank;
        self
    }

    /// Attach a precomputed consumption figure (L/100km).
    ///
    /// Stored and persisted as-is. The statistics engine never reads it.
    #[must_use]
    pub fn with_real_consumption(mut self, real_consumption: f64) -> Self {
        self.real_consumption = real_consumption;
        self
    }

    /// The fill-up's id.
    #[must_use]
    pub fn id(&self) -> FillUpId {
        self.id
    }

    /// The vehicle this fill-up was logged against.
    #[must_use]
    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    /// When the fill-up happened.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Odometer reading in km.
    #[must_use]
    pub fn odometer(&self) -> f64 {
        self.odometer
    }

    /// Fuel volume in liters.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Price per liter in currency units.
    #[must_use]
    pub fn price_per_liter(&self) -> f64 {
        self.price_per_liter
    }

    /// Total cost as stored at construction.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Whether the tank was filled completely.
    #[must_use]
    pub fn is_full_tank(&self) -> bool {
        self.is_full_tank
    }

    /// The stored consumption figure, 0 unless one was attached.
    #[must_use]
    pub fn real_consumption(&self) -> f64 {
        self.real_consumption
    }
}
