//! `fuellog` - A logbook for vehicle fill-ups and fuel consumption
//!
//! This library persists vehicles and fill-ups as JSON blobs in a local
//! key-value store and derives distance, fuel, cost and consumption
//! statistics from the logged fill-ups.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod garage;
pub mod logging;
pub mod model;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use garage::Garage;
pub use logging::init_logging;
pub use model::{FillUp, FillUpId, Vehicle, VehicleId};
pub use stats::Summary;
pub use storage::{Storage, StorageStats};
pub use store::{Collection, MemoryStore, RecordStore};
