//! Records survive a close and reopen of the on-disk database.

use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};

use fuellog::{Collection, FillUp, Garage, RecordStore, Storage, Vehicle};

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("records.db");

    let vehicle_id = {
        let mut garage = Garage::open(Storage::open(&path).unwrap()).unwrap();
        let id = garage.add_vehicle(
            Vehicle::new("Daily", "Skoda", "Fabia", "2016").with_consumption(6.3, 4.4, 5.1),
        );
        garage.add_fill_up(FillUp::new(
            id,
            Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            1000.0,
            40.0,
            1.8,
        ));
        garage.add_fill_up(FillUp::new(
            id,
            Utc.with_ymd_and_hms(2024, 2, 3, 17, 30, 0).unwrap(),
            1400.0,
            32.0,
            1.9,
        ));
        assert!(!garage.is_dirty());
        id
    };

    let garage = Garage::open(Storage::open(&path).unwrap()).unwrap();
    assert_eq!(garage.vehicles().len(), 1);
    assert_eq!(garage.vehicles()[0].id(), vehicle_id);
    assert_eq!(garage.vehicles()[0].model, "Fabia");
    assert_eq!(garage.fill_ups_for(vehicle_id).len(), 2);

    let summary = garage.summary(Some(vehicle_id), &Utc);
    assert_eq!(summary.fill_up_count, 2);
    assert_relative_eq!(summary.total_distance, 400.0);
    assert_relative_eq!(summary.total_fuel, 72.0);
    assert_relative_eq!(summary.total_cost, 72.0 + 60.8, epsilon = 1e-9);
    assert_eq!(summary.consumption_history.len(), 1);
    assert_relative_eq!(summary.consumption_history[0].value, 8.0);
    let months: Vec<&str> = summary
        .monthly_costs
        .iter()
        .map(|m| m.month.as_str())
        .collect();
    assert_eq!(months, ["2024-01", "2024-02"]);
}

#[test]
fn test_removal_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    {
        let mut garage = Garage::open(Storage::open(&path).unwrap()).unwrap();
        let keep = garage.add_vehicle(Vehicle::new("Keep", "", "", ""));
        let drop_id = garage.add_vehicle(Vehicle::new("Sold", "", "", ""));
        let fill_up = garage.add_fill_up(FillUp::new(drop_id, Utc::now(), 10.0, 5.0, 2.0));
        garage.remove_vehicle(drop_id).unwrap();
        assert!(garage.vehicle(keep).is_some());
        assert!(garage.fill_up(fill_up).is_some());
    }

    let garage = Garage::open(Storage::open(&path).unwrap()).unwrap();
    let names: Vec<&str> = garage.vehicles().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Keep"]);
    // Fill-ups of a removed vehicle stay in the log.
    assert_eq!(garage.fill_ups().len(), 1);
}

#[test]
fn test_malformed_blob_opens_as_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    {
        let mut storage = Storage::open(&path).unwrap();
        storage.save_vehicles(&[Vehicle::new("Daily", "", "", "")]).unwrap();
        storage.put(Collection::FillUps.key(), "{ not json").unwrap();
    }

    let mut garage = Garage::open(Storage::open(&path).unwrap()).unwrap();
    assert_eq!(garage.vehicles().len(), 1);
    assert!(garage.fill_ups().is_empty());

    // The next save replaces the unreadable blob.
    let vehicle_id = garage.vehicles()[0].id();
    garage.add_fill_up(FillUp::new(vehicle_id, Utc::now(), 100.0, 20.0, 1.5));
    let reloaded = Storage::open(&path).unwrap().load_fill_ups().unwrap();
    assert_eq!(reloaded.len(), 1);
}
