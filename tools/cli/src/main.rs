use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use gc_tuner::{ReportFormat, SimulationConfig};
use log::info;

mod commands;

use commands::SimulateCommand;

fn cli() -> Command {
    Command::new("gc-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulate adaptive collection thresholds of a generational garbage collector")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (.toml or .json)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .value_name("NUM")
                .help("Number of allocation/collection cycles")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("trash-ratio")
                .long("trash-ratio")
                .value_name("RATIO")
                .help("Fraction of newly allocated objects that are immediately dead")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("long-lived-ratio")
                .long("long-lived-ratio")
                .value_name("RATIO")
                .help("Fraction of promoted objects conservatively retained")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Report format (text, json)")
                .default_value("text")
                .value_parser(value_parser!(ReportFormat)),
        )
        .arg(
            Arg::new("every")
                .long("every")
                .value_name("NUM")
                .help("Print every Nth collection")
                .default_value("1")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("summary-only")
                .long("summary-only")
                .help("Only print the end-of-run summary")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-config")
                .long("dump-config")
                .help("Print the effective configuration as TOML and exit")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<SimulationConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    // Override config with command line arguments
    if let Some(&iterations) = matches.get_one::<u64>("iterations") {
        config.iterations = iterations;
    }
    if let Some(&ratio) = matches.get_one::<f64>("trash-ratio") {
        config.trash_ratio = ratio;
    }
    if let Some(&ratio) = matches.get_one::<f64>("long-lived-ratio") {
        config.long_lived_ratio = ratio;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    if matches.get_flag("dump-config") {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    info!("Generations: {}", config.generations.len());
    info!("Iterations: {}", config.iterations);
    info!(
        "Trash ratio: {}, long-lived ratio: {}",
        config.trash_ratio, config.long_lived_ratio
    );

    let format = matches
        .get_one::<ReportFormat>("format")
        .copied()
        .unwrap_or_default();
    let every = matches.get_one::<u64>("every").copied().unwrap_or(1);

    let stdout = io::stdout();
    let stats = SimulateCommand::new(config)
        .format(format)
        .every(every)
        .summary_only(matches.get_flag("summary-only"))
        .run(stdout.lock())?;

    info!(
        "Done: {} collections ({} full)",
        stats.collections, stats.full_collections
    );
    Ok(())
}
