//! minidb - a single-file, single-table record store with a line-oriented
//! command interpreter.

use anyhow::{Context, Result};
use clap::Parser;
use minidb::repl;
use minidb::table::Table;
use std::io;
use std::path::PathBuf;

/// A tiny persistent record store.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file backing the table (created if absent)
    file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let table = Table::open(&args.file)
        .with_context(|| format!("Failed to open database file: {:?}", args.file))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    repl::run(table, stdin.lock(), stdout.lock())
}
