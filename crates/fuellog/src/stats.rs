//! Consumption and cost statistics over fill-up records.
//!
//! Every function here is pure and total: empty input, a single record,
//! ties and negative values all produce a value rather than an error.
//! Nothing is cached; each call recomputes from the slice it is given.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::Serialize;

use crate::model::{FillUp, VehicleId};

/// Real consumption measured at one fill-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionPoint {
    /// Date of the fill-up that closed the measured distance.
    pub date: DateTime<Utc>,
    /// Consumption in L/100km.
    pub value: f64,
}

/// Accumulated fuel spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCost {
    /// Zero-padded `YYYY-MM` key.
    pub month: String,
    /// Sum of stored fill-up costs in the month.
    pub total: f64,
}

/// Price per liter paid at one fill-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    /// Date of the fill-up.
    pub date: DateTime<Utc>,
    /// Price per liter in currency units.
    pub price_per_liter: f64,
}

/// Fill-ups logged against one vehicle, in input order.
#[must_use]
pub fn for_vehicle(fill_ups: &[FillUp], vehicle_id: VehicleId) -> Vec<FillUp> {
    fill_ups
        .iter()
        .filter(|f| f.vehicle_id() == vehicle_id)
        .cloned()
        .collect()
}

fn sorted_by_date(fill_ups: &[FillUp]) -> Vec<&FillUp> {
    let mut sorted: Vec<&FillUp> = fill_ups.iter().collect();
    sorted.sort_by_key(|f| f.date());
    sorted
}

/// Distance covered between the lowest and highest odometer readings.
///
/// Defined on the range of readings, not on chronological order. Fewer
/// than two records give 0.
#[must_use]
pub fn total_distance(fill_ups: &[FillUp]) -> f64 {
    if fill_ups.len() < 2 {
        return 0.0;
    }
    let mut readings: Vec<f64> = fill_ups.iter().map(FillUp::odometer).collect();
    readings.sort_by(f64::total_cmp);
    match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

/// Sum of fuel volume over all records.
#[must_use]
pub fn total_fuel(fill_ups: &[FillUp]) -> f64 {
    fill_ups.iter().map(FillUp::volume).sum()
}

/// Sum of stored total cost over all records.
#[must_use]
pub fn total_cost(fill_ups: &[FillUp]) -> f64 {
    fill_ups.iter().map(FillUp::total_cost).sum()
}

/// Average consumption in L/100km, or 0 when no distance was covered.
#[must_use]
pub fn average_consumption(fill_ups: &[FillUp]) -> f64 {
    let distance = total_distance(fill_ups);
    if distance > 0.0 {
        total_fuel(fill_ups) / distance * 100.0
    } else {
        0.0
    }
}

/// Per-fill-up consumption derived from consecutive odometer readings.
///
/// Records are ordered by date and compared with their positional
/// predecessor. A point is emitted for a full-tank fill-up whose odometer
/// is above the previous one. Skipped records still serve as the
/// predecessor of the next record.
#[must_use]
pub fn real_consumption_history(fill_ups: &[FillUp]) -> Vec<ConsumptionPoint> {
    let sorted = sorted_by_date(fill_ups);
    sorted
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            if !current.is_full_tank() || current.odometer() <= previous.odometer() {
                return None;
            }
            let distance = current.odometer() - previous.odometer();
            let value = current.volume() / distance * 100.0;
            (value > 0.0).then_some(ConsumptionPoint {
                date: current.date(),
                value,
            })
        })
        .collect()
}

/// Monthly cost buckets in the local system timezone.
#[must_use]
pub fn monthly_costs(fill_ups: &[FillUp]) -> Vec<MonthlyCost> {
    monthly_costs_in(fill_ups, &Local)
}

/// Monthly cost buckets with months taken in the given timezone.
///
/// Output is ascending by `YYYY-MM` key.
#[must_use]
pub fn monthly_costs_in<Tz: TimeZone>(fill_ups: &[FillUp], tz: &Tz) -> Vec<MonthlyCost> {
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for fill_up in fill_ups {
        let local = fill_up.date().with_timezone(tz);
        let key = format!("{:04}-{:02}", local.year(), local.month());
        *buckets.entry(key).or_insert(0.0) += fill_up.total_cost();
    }
    buckets
        .into_iter()
        .map(|(month, total)| MonthlyCost { month, total })
        .collect()
}

/// Price per liter over time, ordered by date. Same-date entries are kept.
#[must_use]
pub fn price_history(fill_ups: &[FillUp]) -> Vec<PricePoint> {
    sorted_by_date(fill_ups)
        .into_iter()
        .map(|f| PricePoint {
            date: f.date(),
            price_per_liter: f.price_per_liter(),
        })
        .collect()
}

/// Every aggregate for a set of fill-ups, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of fill-ups considered.
    pub fill_up_count: usize,
    /// See [`total_distance`].
    pub total_distance: f64,
    /// See [`total_fuel`].
    pub total_fuel: f64,
    /// See [`total_cost`].
    pub total_cost: f64,
    /// See [`average_consumption`].
    pub average_consumption: f64,
    /// See [`real_consumption_history`].
    pub consumption_history: Vec<ConsumptionPoint>,
    /// See [`monthly_costs_in`].
    pub monthly_costs: Vec<MonthlyCost>,
    /// See [`price_history`].
    pub price_history: Vec<PricePoint>,
}

impl Summary {
    /// Compute every aggregate, bucketing months in `tz`.
    #[must_use]
    pub fn from_fill_ups<Tz: TimeZone>(fill_ups: &[FillUp], tz: &Tz) -> Self {
        Self {
            fill_up_count: fill_ups.len(),
            total_distance: total_distance(fill_ups),
            total_fuel: total_fuel(fill_ups),
            total_cost: total_cost(fill_ups),
            average_consumption: average_consumption(fill_ups),
            consumption_history: real_consumption_history(fill_ups),
            monthly_costs: monthly_costs_in(fill_ups, tz),
            price_history: price_history(fill_ups),
        }
    }

    /// Whether there was nothing to summarize.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fill_up_count == 0
    }
}
