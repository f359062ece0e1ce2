pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod poll;
pub mod render;
pub mod runtime;
pub mod service;
#[cfg(test)]
mod test_support;

use clap::Parser;

use crate::bootstrap::AppPaths;
use crate::cli::{Cli, Command};
use crate::config::{load_config, AppConfig};
use crate::error::AppResult;
use crate::runtime::{list_report, run_app, status_report};

trait CommandExecutor {
    fn run(&self, config: AppConfig, paths: AppPaths) -> AppResult<()>;
    fn status(&self, config: &AppConfig, json: bool) -> AppResult<()>;
    fn list(&self, config: &AppConfig, json: bool) -> AppResult<()>;
}

struct DefaultCommandExecutor;

impl CommandExecutor for DefaultCommandExecutor {
    fn run(&self, config: AppConfig, paths: AppPaths) -> AppResult<()> {
        run_app(config, paths)
    }

    fn status(&self, config: &AppConfig, json: bool) -> AppResult<()> {
        println!("{}", status_report(config, json)?);
        Ok(())
    }

    fn list(&self, config: &AppConfig, json: bool) -> AppResult<()> {
        println!("{}", list_report(config, json)?);
        Ok(())
    }
}

fn execute_command<E: CommandExecutor>(
    command: Command,
    paths: AppPaths,
    config: AppConfig,
    executor: &E,
) -> AppResult<()> {
    match command {
        Command::Run => executor.run(config, paths),
        Command::Status { json } => executor.status(&config, json),
        Command::List { json } => executor.list(&config, json),
    }
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve()?;
    paths.ensure_dirs()?;

    let config = load_config(&paths, &cli.to_overrides())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.diagnostics.log_level.clone().into()),
        )
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    execute_command(cli.command, paths, config, &DefaultCommandExecutor)
}
