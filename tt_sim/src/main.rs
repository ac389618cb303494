//! Headless card tabletop simulator.
//!
//! Loads a settings record, replays a seeded random gesture script through
//! the interaction machine and prints the resulting action log.

mod config;
mod driver;

use std::path::PathBuf;

use anyhow::{Context, Error};
use log::{info, warn};
use pico_args::Arguments;
use tabletop::TableSettings;

use crate::{config::SimConfig, driver::Driver};

const HELP: &str = "\
Replay random gestures against a shared card table

USAGE:
  tt_sim [OPTIONS]

OPTIONS:
  --settings   PATH        Settings record (JSON)      [default: env TT_SETTINGS or built-in defaults]
  --steps      N           Input events to replay      [default: env TT_STEPS or 500]
  --seed       N           Gesture script seed         [default: env TT_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  TT_PLAYERS               Players at the table, 1 to 8 [default: 2]
  TT_FELT_WIDTH            Felt width in pixels [default: 1280]
  TT_FELT_HEIGHT           Felt height in pixels [default: 800]
  TT_FULL_LOG              Print the whole action log (true/false)
  RUST_LOG                 Log filter, e.g. tabletop=debug
";

/// How many trailing log entries to print without TT_FULL_LOG.
const LOG_TAIL: usize = 20;

struct Args {
    settings: Option<PathBuf>,
    steps: Option<usize>,
    seed: Option<u64>,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        settings: pargs.opt_value_from_str("--settings")?,
        steps: pargs.opt_value_from_str("--steps")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };
    let remaining = pargs.finish();

    env_logger::builder().format_target(false).init();
    if !remaining.is_empty() {
        warn!("Ignoring unrecognized arguments: {remaining:?}");
    }

    let config = SimConfig::from_env(args.settings, args.steps, args.seed);
    config.validate()?;

    let settings = match &config.settings_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            TableSettings::from_json_str(&text)
        }
        None => TableSettings::default(),
    };
    info!(
        "Simulating {} steps with seed {} on a {} felt",
        config.steps, config.seed, settings.shape
    );

    let mut driver = Driver::new(settings, &config)?;
    let report = driver.run(config.steps)?;

    let entries = driver.table().log().entries();
    let skip = if config.full_log {
        0
    } else {
        entries.len().saturating_sub(LOG_TAIL)
    };
    if skip > 0 {
        println!("... {skip} earlier actions");
    }
    for entry in &entries[skip..] {
        println!("{entry}");
    }

    println!(
        "{} events, {} gestures, {} idle audits, {} cards accounted for",
        report.events, report.gestures, report.audits, report.census.total
    );
    Ok(())
}
