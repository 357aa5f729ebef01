//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and the value
//! parsers that validate user input before it becomes a record.

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};

use crate::error::Error;
use crate::model::{FillUp, FillUpId, Vehicle, VehicleId};

/// Vehicle management commands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Register a new vehicle
    Add(AddVehicleArgs),

    /// List registered vehicles
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Change fields of an existing vehicle
    Update(UpdateVehicleArgs),

    /// Remove a vehicle (its fill-ups are kept)
    Remove {
        /// Id of the vehicle to remove
        #[arg(value_parser = parse_vehicle_id)]
        id: VehicleId,
    },
}

/// Arguments for `vehicle add`.
#[derive(Debug, Args)]
pub struct AddVehicleArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Manufacturer
    #[arg(long, default_value = "")]
    pub make: String,

    /// Model name
    #[arg(long, default_value = "")]
    pub model: String,

    /// Model year
    #[arg(long, default_value = "")]
    pub year: String,

    /// Stated city consumption (L/100km)
    #[arg(long, default_value_t = 0.0, value_parser = parse_amount)]
    pub city: f64,

    /// Stated highway consumption (L/100km)
    #[arg(long, default_value_t = 0.0, value_parser = parse_amount)]
    pub highway: f64,

    /// Stated mixed consumption (L/100km)
    #[arg(long, default_value_t = 0.0, value_parser = parse_amount)]
    pub mixed: f64,
}

impl AddVehicleArgs {
    /// Build a new vehicle with a fresh id.
    #[must_use]
    pub fn into_vehicle(self) -> Vehicle {
        Vehicle::new(self.name, self.make, self.model, self.year).with_consumption(
            self.city,
            self.highway,
            self.mixed,
        )
    }
}

/// Arguments for `vehicle update`.
#[derive(Debug, Args)]
pub struct UpdateVehicleArgs {
    /// Id of the vehicle to update
    #[arg(value_parser = parse_vehicle_id)]
    pub id: VehicleId,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New manufacturer
    #[arg(long)]
    pub make: Option<String>,

    /// New model name
    #[arg(long)]
    pub model: Option<String>,

    /// New model year
    #[arg(long)]
    pub year: Option<String>,

    /// New city consumption (L/100km)
    #[arg(long, value_parser = parse_amount)]
    pub city: Option<f64>,

    /// New highway consumption (L/100km)
    #[arg(long, value_parser = parse_amount)]
    pub highway: Option<f64>,

    /// New mixed consumption (L/100km)
    #[arg(long, value_parser = parse_amount)]
    pub mixed: Option<f64>,
}

impl UpdateVehicleArgs {
    /// Apply the given fields to `vehicle`, returning an edited copy.
    #[must_use]
    pub fn apply(&self, vehicle: &Vehicle) -> Vehicle {
        let mut edited = vehicle.clone();
        if let Some(name) = &self.name {
            edited.name.clone_from(name);
        }
        if let Some(make) = &self.make {
            edited.make.clone_from(make);
        }
        if let Some(model) = &self.model {
            edited.model.clone_from(model);
        }
        if let Some(year) = &self.year {
            edited.year.clone_from(year);
        }
        if let Some(city) = self.city {
            edited.consumption_city = city;
        }
        if let Some(highway) = self.highway {
            edited.consumption_highway = highway;
        }
        if let Some(mixed) = self.mixed {
            edited.consumption_mixed = mixed;
        }
        edited
    }

    /// Whether any field was given.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.make.is_some()
            || self.model.is_some()
            || self.year.is_some()
            || self.city.is_some()
            || self.highway.is_some()
            || self.mixed.is_some()
    }
}

/// Fill-up commands.
#[derive(Debug, Subcommand)]
pub enum FillUpCommand {
    /// Log a fill-up
    Add(AddFillUpArgs),

    /// List logged fill-ups, oldest first
    List {
        /// Only show fill-ups of this vehicle
        #[arg(long, value_parser = parse_vehicle_id)]
        vehicle: Option<VehicleId>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove a fill-up
    Remove {
        /// Id of the fill-up to remove
        #[arg(value_parser = parse_fill_up_id)]
        id: FillUpId,
    },
}

/// Arguments for `fillup add`.
#[derive(Debug, Args)]
pub struct AddFillUpArgs {
    /// Vehicle the fill-up belongs to
    #[arg(long, value_parser = parse_vehicle_id)]
    pub vehicle: VehicleId,

    /// Odometer reading (km)
    #[arg(long, value_parser = parse_amount)]
    pub odometer: f64,

    /// Fuel volume (liters)
    #[arg(long, value_parser = parse_amount)]
    pub volume: f64,

    /// Price per liter
    #[arg(long, value_parser = parse_amount)]
    pub price: f64,

    /// When the fill-up happened (RFC 3339 or YYYY-MM-DD); defaults to now
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,

    /// The tank was not filled completely
    #[arg(long)]
    pub partial: bool,
}

impl AddFillUpArgs {
    /// Build the fill-up, dating it `now` when no date was given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `volume * price` is not a finite
    /// number.
    pub fn into_fill_up(self, now: DateTime<Utc>) -> Result<FillUp, Error> {
        let total = self.volume * self.price;
        if !total.is_finite() {
            return Err(Error::invalid_input(format!(
                "total cost of {} L at {} per liter is out of range",
                self.volume, self.price
            )));
        }
        Ok(FillUp::new(
            self.vehicle,
            self.date.unwrap_or(now),
            self.odometer,
            self.volume,
            self.price,
        )
        .with_full_tank(!self.partial))
    }
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Only consider fill-ups of this vehicle
    #[arg(long, value_parser = parse_vehicle_id)]
    pub vehicle: Option<VehicleId>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

fn parse_vehicle_id(s: &str) -> Result<VehicleId, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_fill_up_id(s: &str) -> Result<FillUpId, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

/// Parse a finite, non-negative number.
fn parse_amount(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite number"));
    }
    if value < 0.0 {
        return Err(format!("'{s}' must not be negative"));
    }
    Ok(value)
}

/// Parse an RFC 3339 timestamp, or a `YYYY-MM-DD` date taken as local midnight.
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("'{s}' is neither RFC 3339 nor YYYY-MM-DD"))?;
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("'{s}' has no local midnight"))
}
