mod api;
mod cli;
mod commands;
mod config;
mod effect;
mod model;
mod util;
mod views;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::api::ApiError;
use crate::cli::{Cli, Commands};
use crate::config::ApiConfig;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        if let Some(api) = err.downcast_ref::<ApiError>() {
            error!(
                path = api.path(),
                status = ?api.status(),
                body = %api.body().map(ToString::to_string).unwrap_or_default(),
                "service response"
            );
        }
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ApiConfig::from_args(&cli.api);

    match cli.command {
        Commands::Meta(args) => commands::meta::run(config, args),
        Commands::Recommend(args) => commands::recommend::run(config, args),
        Commands::Details(args) => commands::details::run(config, args),
        Commands::Shell => commands::shell::run(config),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
