// Vet Calendar diagnostic entry point
// Loads the clinic from the configured backend and prints one day's grid

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Local;

use vet_calendar::config::ClinicConfig;
use vet_calendar::state::{Clinic, ClinicOptions};
use vet_calendar::utils::date::parse_iso_date;

struct Args {
    config: Option<PathBuf>,
    date: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        date: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                args.config = Some(PathBuf::from(path));
            }
            _ if args.date.is_none() => args.date = Some(arg),
            _ => return Err(anyhow!("Unexpected argument: {}", arg)),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let config = ClinicConfig::load(args.config.as_deref());
    log::info!("Starting Vet Calendar with {:?} backend", config.backend.kind);

    let today = Local::now().date_naive();
    let date = match args.date.as_deref() {
        Some(value) => {
            parse_iso_date(value).with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))?
        }
        None => today,
    };

    let backend = config.open_backend()?;
    let mut clinic = Clinic::new(backend, ClinicOptions::from(&config), today);
    if !clinic.refresh() {
        log::warn!("Some collections failed to load; showing what was available");
    }
    clinic.select_date(date);

    print!("{}", clinic.day_layout());

    let board = clinic.waitlist_board();
    println!();
    println!("Waitlist ({} waiting)", board.len());
    for entry in &board.unassigned {
        println!("  unassigned  {}  {}", entry.display_time(), entry.patient_name);
    }
    for lane in &board.lanes {
        for entry in &lane.entries {
            println!("  {}  {}  {}", lane.vet.name, entry.display_time(), entry.patient_name);
        }
    }

    Ok(())
}
