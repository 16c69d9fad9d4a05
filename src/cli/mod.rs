use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::client::XmlRpcClient;
use crate::config::Credentials;
use crate::sync::{SyncReport, SyncRunner};

#[derive(Parser)]
#[command(name = "odoo-sync")]
#[command(about = "Sync loyalty/brand dashboard tasks in an Odoo project over XML-RPC")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Fallback config file (default: ~/.cursor/mcp.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show intended stage moves and task creations without issuing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Parse arguments, resolve credentials, authenticate, and run the sync
pub fn run() -> Result<SyncReport> {
    let cli = Cli::parse();
    let creds = Credentials::resolve(cli.config.as_deref())?;
    let client = XmlRpcClient::authenticate(&creds)?;
    SyncRunner::run(&client, cli.dry_run)
}
