use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::Parser;
use envconfig::Envconfig;
use insights_common::config::Config;
use insights_common::loader::Snapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::router::View;
use crate::tui::start_dashboard;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the precomputed segment and affinity tables
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Screen to open first
    #[arg(long, value_enum, default_value_t = View::Customers)]
    view: View,

    /// Seed for the suggestion shuffle, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    pub fn run() -> Result<(), Error> {
        let command = Cli::parse();
        let config = command.config()?;

        let snapshot = Snapshot::load(&config.data_dir);
        if snapshot.row_counts().is_empty() {
            warn!(
                data_dir = %config.data_dir.display(),
                "no tables found, every view will report missing data"
            );
        }

        let rng = match command.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(view = ?command.view, "starting dashboard");
        start_dashboard(&snapshot, &config, command.view, rng)
    }

    fn config(&self) -> Result<Config, Error> {
        let mut config = Config::init_from_env().context("failed to load configuration from env")?;
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
