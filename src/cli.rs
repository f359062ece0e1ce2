use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CliOverrides;

#[derive(Debug, Parser)]
#[command(name = "actas-console")]
#[command(about = "Console client for the Actas meeting recording service")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(long)]
    pub list_interval_ms: Option<u64>,

    #[arg(long)]
    pub detail_interval_ms: Option<u64>,

    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive console synchronized with the server.
    Run,
    /// One-shot capture status summary.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// One-shot dump of the recording collection.
    List {
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            server_url: self.server_url.clone(),
            list_interval_ms: self.list_interval_ms,
            detail_interval_ms: self.detail_interval_ms,
            log_level: self.log_level.clone(),
        }
    }
}
