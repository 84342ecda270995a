mod config;
mod engine;
mod error;
mod menu;
mod model;
mod shop;
mod species;
mod stats;

use crate::config::Config;
use crate::menu::Menu;
use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML file with gameplay tuning values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Zoo name; asked for interactively when absent.
    #[arg(long)]
    name: Option<String>,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(path) => Config::from_file(path).context("failed to load config")?,
        None => Config::default(),
    };

    let rng = match args.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng")?,
    };

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut menu = Menu::open(cfg, args.name, stdin, stdout, rng).context("failed to open zoo")?;

    let outcome = menu.run().context("game aborted")?;
    log::info!("game ended: {outcome:?}");

    Ok(())
}
