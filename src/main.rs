//! `atm-ledger` binary.
//!
//! Logs users from the built-in roster (shehab, ritu, saba) in and out of a
//! simulated ATM by replaying a script with one CSV row per action. Each row
//! names an `op` plus whichever of `user,pin,amount,target,detail,receipt`
//! it needs. Rejected rows are logged and the replay carries on.
//!
//! When the script ends, one `user,balance,transactions,locked` line per
//! user is printed to stdout, sorted by name.
//!
//! An optional second file overrides the ATM limits (fee, caps, note size,
//! PIN rules); its first data row is read and missing columns keep their
//! defaults:
//!
//! ```bash
//! atm-ledger session.csv
//! atm-ledger session.csv limits.csv
//! RUST_LOG=debug atm-ledger session.csv
//! ```

use atm_ledger::{AtmEngine, EngineError, Limits, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let limits = match args.get(2) {
        Some(path) => read_limits(path)?,
        None => Limits::default(),
    };

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut engine = AtmEngine::with_limits(limits)?;
    engine.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}

/// Reads the first row of a limits CSV; absent columns keep their defaults.
fn read_limits(path: &str) -> Result<Limits> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    match reader.deserialize::<Limits>().next() {
        Some(limits) => Ok(limits?),
        None => Err(EngineError::EmptyLimits),
    }
}
