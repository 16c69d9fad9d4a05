//! odoo-sync - one-off operational task runner for an Odoo project
//!
//! Authenticates against an Odoo instance over XML-RPC, locates the
//! loyalty/brand dashboard project by name, moves keyword-matched tasks
//! into the done stage, and idempotently creates a fixed list of
//! follow-up tasks. This library provides:
//! - Credential resolution from the environment or `~/.cursor/mcp.json`
//! - A minimal XML-RPC codec and the `execute_kw` client
//! - The `OdooApi` trait so the run can be tested against a fake service
//! - Remote-model repositories and the sequential sync runner
//!
//! # Example
//!
//! ```no_run
//! use odoo_sync::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod repo;
pub mod rpc;
pub mod sync;
