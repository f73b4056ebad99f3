//! MinLog CLI
//!
//! Command-line front end for transaction properties and timed commands.
//!
//! # Usage
//!
//! ```bash
//! # Derive properties from inbound headers (generates x-transaction-id if missing)
//! minlog derive -H client_id=abc
//!
//! # Time a command, logging enter/exit with elapsedMS
//! minlog timed -p client_id=abc -p x-transaction-id=T1 -- ./sync-orders.sh
//!
//! # Describe the active configuration
//! minlog info --config-id orders-config --connection-id conn-7
//! ```
//!
//! # Exit Codes
//!
//! - `timed`: the child's exit code, or 127 if it could not be started
//! - otherwise 0 on success, 1 on error

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use minlog_core::{init_tracing, CorrelationContext, MinLogConfig, TimedExecutor, TracingSink};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.global.apply(MinLogConfig::from_env()?);

    init_tracing(&config)?;
    tracing::debug!(config_id = %config.config_id, logger = %config.logger, "Starting minlog");

    let sink = Arc::new(TracingSink::with_logger(config.logger.clone()));

    match cli.command {
        Command::Derive {
            headers,
            no_headers,
        } => {
            let ctx = CorrelationContext::new(sink);
            println!("{}", commands::derive(&ctx, &headers, no_headers)?);
        }
        Command::Timed {
            properties,
            program,
        } => {
            let exec = TimedExecutor::new(sink);
            let code = commands::timed(&exec, &properties, &program).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Info {
            config_id,
            connection_id,
        } => {
            println!("{}", commands::info(&config, config_id, connection_id));
        }
    }

    Ok(())
}
