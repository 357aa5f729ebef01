//! `fuellog` - CLI for the fill-up logbook
//!
//! This binary opens the records database, applies the requested command
//! and prints records or statistics.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use clap::Parser;
use tracing::info;

use fuellog::cli::{
    output, Cli, Command, ConfigCommand, FillUpCommand, StatsCommand, VehicleCommand,
};
use fuellog::config::TimezoneMode;
use fuellog::{init_logging, Config, Garage, Storage, Summary};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    let command = match cli.command {
        Command::Config(config_cmd) => return handle_config(&config, config_cmd),
        command => command,
    };

    let database_path = config.database_path();
    let storage = Storage::open(&database_path)
        .with_context(|| format!("cannot open records at {}", database_path.display()))?;
    info!("Using records at {}", database_path.display());
    let mut garage = Garage::open(storage)?;

    let result = match command {
        Command::Vehicle(cmd) => handle_vehicle(&mut garage, &config, cmd),
        Command::Fillup(cmd) => handle_fill_up(&mut garage, &config, cmd),
        Command::Stats(cmd) => handle_stats(&garage, &config, &cmd),
        Command::Config(_) => Ok(()),
    };

    // A failed save leaves the change in memory; retry once before exiting.
    if garage.is_dirty() {
        garage
            .flush()
            .context("changes could not be saved to the records database")?;
    }
    result
}

fn handle_vehicle(
    garage: &mut Garage<Storage>,
    config: &Config,
    cmd: VehicleCommand,
) -> anyhow::Result<()> {
    match cmd {
        VehicleCommand::Add(args) => {
            let id = garage.add_vehicle(args.into_vehicle());
            println!("{id}");
        }
        VehicleCommand::List { format } => {
            print!("{}", output::vehicles(garage.vehicles(), format, &config.display)?);
        }
        VehicleCommand::Update(args) => {
            if !args.has_changes() {
                bail!("nothing to update; pass at least one field");
            }
            let current = garage
                .vehicle(args.id)
                .ok_or(fuellog::Error::VehicleNotFound(args.id))?;
            let edited = args.apply(current);
            garage.update_vehicle(edited)?;
            println!("Updated {}", args.id);
        }
        VehicleCommand::Remove { id } => {
            let removed = garage.remove_vehicle(id)?;
            let orphaned = garage.fill_ups_for(id).len();
            println!("Removed {} ({})", removed.name, id);
            if orphaned > 0 {
                println!("{orphaned} fill-ups still reference this vehicle.");
            }
        }
    }
    Ok(())
}

fn handle_fill_up(
    garage: &mut Garage<Storage>,
    config: &Config,
    cmd: FillUpCommand,
) -> anyhow::Result<()> {
    match cmd {
        FillUpCommand::Add(args) => {
            let id = garage.add_fill_up(args.into_fill_up(Utc::now())?);
            println!("{id}");
        }
        FillUpCommand::List { vehicle, format } => {
            let fill_ups = match vehicle {
                Some(vehicle_id) => garage.fill_ups_for(vehicle_id),
                None => garage.fill_ups().to_vec(),
            };
            print!(
                "{}",
                output::fill_ups(&fill_ups, garage.vehicles(), format, &config.display)?
            );
        }
        FillUpCommand::Remove { id } => {
            garage.remove_fill_up(id)?;
            println!("Removed {id}");
        }
    }
    Ok(())
}

fn handle_stats(
    garage: &Garage<Storage>,
    config: &Config,
    cmd: &StatsCommand,
) -> anyhow::Result<()> {
    let summary: Summary = match config.display.timezone {
        TimezoneMode::Local => garage.summary(cmd.vehicle, &Local),
        TimezoneMode::Utc => garage.summary(cmd.vehicle, &Utc),
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if let Some(vehicle_id) = cmd.vehicle {
        match garage.vehicle(vehicle_id) {
            Some(vehicle) => {
                println!("{} ({} {} {})", vehicle.name, vehicle.make, vehicle.model, vehicle.year);
                println!(
                    "Stated consumption:   {} L/100km",
                    output::number(vehicle.average_consumption(), &config.display)
                );
            }
            None => println!("Vehicle {vehicle_id} (removed)"),
        }
        println!();
    }
    print!("{}", output::summary(&summary, &config.display));
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                let database_path = config.database_path();
                println!("  Database path:      {}", database_path.display());
                if database_path.exists() {
                    let storage = Storage::open(&database_path)?;
                    print!("{}", output::storage(&storage.stats()?, &storage.keys()?));
                } else {
                    println!("  (database not created yet)");
                }
                println!();
                println!("[Display]");
                println!("  Currency:           {}", config.display.currency);
                println!("  Decimals:           {}", config.display.decimals);
                println!("  Timezone:           {:?}", config.display.timezone);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
