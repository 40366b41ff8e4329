//! Standalone harness wiring together configuration loading, the daily
//! cycle, and the two CSV sinks. Mirrors the role of the original
//! `test_engine.cpp` timing harness and the `binding.cpp` host surface, as
//! an in-process binary rather than a native-extension boundary.

use std::env;
use std::fs;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use social_sim_engine::config::Config;
use social_sim_engine::csv_log::{save_interactions_csv, save_states_csv};
use social_sim_engine::Engine;

struct Args {
    config_path: String,
    seed: u64,
    days: usize,
    interactions_per_day: usize,
    states_csv: String,
    interactions_csv: String,
}

fn parse_args() -> Args {
    let mut config_path = "archetypes.toml".to_string();
    let mut seed = 42u64;
    let mut days = 30usize;
    let mut interactions_per_day = 1usize;
    let mut states_csv = "states.csv".to_string();
    let mut interactions_csv = "interactions.csv".to_string();

    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--config" => config_path = iter.next().unwrap_or(config_path),
            "--seed" => seed = iter.next().and_then(|v| v.parse().ok()).unwrap_or(seed),
            "--days" => days = iter.next().and_then(|v| v.parse().ok()).unwrap_or(days),
            "--interactions-per-day" => {
                interactions_per_day = iter.next().and_then(|v| v.parse().ok()).unwrap_or(interactions_per_day)
            }
            "--states-csv" => states_csv = iter.next().unwrap_or(states_csv),
            "--interactions-csv" => interactions_csv = iter.next().unwrap_or(interactions_csv),
            other => {
                eprintln!("ignoring unrecognised argument: {other}");
            }
        }
    }

    Args {
        config_path,
        seed,
        days,
        interactions_per_day,
        states_csv,
        interactions_csv,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();

    let document = match fs::read_to_string(&args.config_path) {
        Ok(s) => s,
        Err(err) => {
            error!(path = %args.config_path, %err, "failed to read configuration file");
            return ExitCode::FAILURE;
        }
    };

    let mut engine: Engine = match Config::from_toml_str(&document) {
        Ok(config) => config.build_engine(),
        Err(err) => {
            error!(%err, "configuration failed validation");
            return ExitCode::FAILURE;
        }
    };
    engine.seed(args.seed);

    info!(agents = engine.num_agents(), days = args.days, "starting simulation");

    for day in 0..args.days {
        engine.perform_daily_cycle(args.interactions_per_day);
        let date = format!("day-{day:04}");
        let is_first = day == 0;
        save_states_csv(&engine, &args.states_csv, &date, is_first);
        save_interactions_csv(&engine, &args.interactions_csv, &date, is_first);
    }

    info!("simulation complete");
    ExitCode::SUCCESS
}
