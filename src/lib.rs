pub mod cli;
pub mod columns;
pub mod error;
pub mod frame;
pub mod inspect;
pub mod io_utils;
pub mod join;
pub mod layout;
pub mod loader;
pub mod metadata;
pub mod pipeline;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands},
    pipeline::{MergeConfig, MergeOutcome},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("metalog_merge", LevelFilter::Info);
        }
        let _ = builder
            .target(env_logger::Target::Stdout)
            .format_timestamp_millis()
            .try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Merge(args) => handle_merge(&args),
        Commands::Inspect(args) => inspect::execute(&args),
    }
}

fn handle_merge(args: &cli::MergeArgs) -> Result<()> {
    let config = MergeConfig::from_args(args)?;
    debug!("Merge configuration: {:?}", config);
    let summary = pipeline::run(&config)?;
    if let Some(path) = &args.summary {
        summary
            .save(path)
            .with_context(|| format!("Writing run summary to {path:?}"))?;
        info!("Run summary written to {path:?}");
    }
    if let MergeOutcome::Empty { .. } = summary.outcome {
        info!("Inspect the example IDs above and check the identifier columns of both inputs");
    }
    Ok(())
}
