//! Rendering of records and statistics for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::config::{DisplayConfig, TimezoneMode};
use crate::error::Result;
use crate::model::{FillUp, Vehicle, VehicleId};
use crate::stats::Summary;
use crate::storage::StorageStats;

use super::OutputFormat;

/// Format a number with the configured precision.
#[must_use]
pub fn number(value: f64, display: &DisplayConfig) -> String {
    format!("{value:.prec$}", prec = display.decimals)
}

/// Format a monetary amount with the configured precision and currency.
#[must_use]
pub fn amount(value: f64, display: &DisplayConfig) -> String {
    format!("{} {}", number(value, display), display.currency)
}

/// Format a timestamp in the configured timezone.
#[must_use]
pub fn date(value: DateTime<Utc>, display: &DisplayConfig) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M";
    match display.timezone {
        TimezoneMode::Local => value.with_timezone(&Local).format(FORMAT).to_string(),
        TimezoneMode::Utc => value.format(FORMAT).to_string(),
    }
}

/// Render the vehicle list.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn vehicles(
    vehicles: &[Vehicle],
    format: OutputFormat,
    display: &DisplayConfig,
) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(vehicles)?);
    }
    if vehicles.is_empty() {
        return Ok("No vehicles registered.\n".to_string());
    }

    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            let _ = writeln!(
                out,
                "{:<36}  {:<16}  {:<12}  {:<12}  {:<6}  {:>8}",
                "ID", "NAME", "MAKE", "MODEL", "YEAR", "L/100KM"
            );
            for v in vehicles {
                let _ = writeln!(
                    out,
                    "{:<36}  {:<16}  {:<12}  {:<12}  {:<6}  {:>8}",
                    v.id(),
                    v.name,
                    v.make,
                    v.model,
                    v.year,
                    number(v.average_consumption(), display)
                );
            }
        }
        OutputFormat::Plain | OutputFormat::Json => {
            for v in vehicles {
                let _ = writeln!(
                    out,
                    "{} {} ({} {} {}) stated {} L/100km",
                    v.id(),
                    v.name,
                    v.make,
                    v.model,
                    v.year,
                    number(v.average_consumption(), display)
                );
            }
        }
    }
    Ok(out)
}

fn vehicle_name(vehicles: &[Vehicle], id: VehicleId) -> &str {
    vehicles
        .iter()
        .find(|v| v.id() == id)
        .map_or("(removed)", |v| v.name.as_str())
}

/// Render fill-ups, oldest first.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn fill_ups(
    fill_ups: &[FillUp],
    vehicles: &[Vehicle],
    format: OutputFormat,
    display: &DisplayConfig,
) -> Result<String> {
    let mut sorted: Vec<&FillUp> = fill_ups.iter().collect();
    sorted.sort_by_key(|f| f.date());

    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&sorted)?);
    }
    if sorted.is_empty() {
        return Ok("No fill-ups logged.\n".to_string());
    }

    let mut out = String::new();
    match format {
        OutputFormat::Table => {
            let _ = writeln!(
                out,
                "{:<36}  {:<16}  {:<16}  {:>10}  {:>8}  {:>8}  {:>12}  {:<4}",
                "ID", "DATE", "VEHICLE", "ODOMETER", "LITERS", "PRICE", "TOTAL", "FULL"
            );
            for f in sorted {
                let _ = writeln!(
                    out,
                    "{:<36}  {:<16}  {:<16}  {:>10.0}  {:>8}  {:>8}  {:>12}  {:<4}",
                    f.id(),
                    date(f.date(), display),
                    vehicle_name(vehicles, f.vehicle_id()),
                    f.odometer(),
                    number(f.volume(), display),
                    number(f.price_per_liter(), display),
                    amount(f.total_cost(), display),
                    if f.is_full_tank() { "yes" } else { "no" }
                );
            }
        }
        OutputFormat::Plain | OutputFormat::Json => {
            for f in sorted {
                let _ = writeln!(
                    out,
                    "{} {} {} at {:.0} km: {} L x {} = {}{}",
                    f.id(),
                    date(f.date(), display),
                    vehicle_name(vehicles, f.vehicle_id()),
                    f.odometer(),
                    number(f.volume(), display),
                    number(f.price_per_liter(), display),
                    amount(f.total_cost(), display),
                    if f.is_full_tank() { "" } else { " (partial)" }
                );
            }
        }
    }
    Ok(out)
}

/// Render a statistics report.
#[must_use]
pub fn summary(summary: &Summary, display: &DisplayConfig) -> String {
    let mut out = String::new();
    if summary.is_empty() {
        out.push_str("No fill-ups logged.\n");
        return out;
    }

    let _ = writeln!(out, "Fill-ups:             {}", summary.fill_up_count);
    let _ = writeln!(
        out,
        "Distance:             {} km",
        number(summary.total_distance, display)
    );
    let _ = writeln!(
        out,
        "Fuel:                 {} L",
        number(summary.total_fuel, display)
    );
    let _ = writeln!(
        out,
        "Cost:                 {}",
        amount(summary.total_cost, display)
    );
    let _ = writeln!(
        out,
        "Average consumption:  {} L/100km",
        number(summary.average_consumption, display)
    );

    if !summary.consumption_history.is_empty() {
        out.push_str("\nConsumption (L/100km)\n");
        for point in &summary.consumption_history {
            let _ = writeln!(
                out,
                "  {}  {:>8}",
                date(point.date, display),
                number(point.value, display)
            );
        }
    }

    out.push_str("\nMonthly cost\n");
    for month in &summary.monthly_costs {
        let _ = writeln!(out, "  {}  {:>12}", month.month, amount(month.total, display));
    }

    out.push_str("\nPrice per liter\n");
    for point in &summary.price_history {
        let _ = writeln!(
            out,
            "  {}  {:>8}",
            date(point.date, display),
            number(point.price_per_liter, display)
        );
    }
    out
}

/// Render database statistics as indented `config show` lines.
#[must_use]
pub fn storage(stats: &StorageStats, keys: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Database size:      {} bytes", stats.db_size_bytes);
    let collections = if keys.is_empty() {
        "(none)".to_string()
    } else {
        keys.join(", ")
    };
    let _ = writeln!(out, "  Collections:        {collections}");
    let last_update = stats
        .last_update
        .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
    let _ = writeln!(out, "  Last saved:         {last_update}");
    out
}
