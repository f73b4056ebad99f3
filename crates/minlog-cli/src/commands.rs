//! Subcommand implementations.

use std::process::ExitStatus;

use anyhow::{Context, Result};
use thiserror::Error;

use minlog_core::{
    retrieve_info, ConnectionInfo, CorrelationContext, InboundHeaders, MinLogConfig,
    PropertyMap, TimedExecutor,
};

/// Exit code used when the child process could not be started
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Why a timed child process did not succeed
#[derive(Error, Debug)]
pub enum ChildError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("process exited with {0}")]
    Exit(ExitStatus),
}

impl ChildError {
    /// Exit code to mirror back to the caller
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildError::Spawn { .. } => SPAWN_FAILURE_CODE,
            ChildError::Exit(status) => status.code().unwrap_or(1),
        }
    }
}

/// Derive properties from `NAME=VALUE` headers and render them as JSON.
///
/// `no_headers` models a call without any request context.
pub fn derive(
    ctx: &CorrelationContext,
    headers: &[(String, String)],
    no_headers: bool,
) -> Result<String> {
    let props = if no_headers {
        ctx.derive_properties::<InboundHeaders>(None)
    } else {
        let inbound = InboundHeaders::from_pairs(headers.iter().map(|(k, v)| (k, v.clone())));
        ctx.derive_properties(Some(&inbound))
    };
    serde_json::to_string(&props).context("Failed to render properties")
}

/// Run `program` as a timed unit of work and return the exit code to use.
pub async fn timed(
    exec: &TimedExecutor,
    properties: &[(String, String)],
    program: &[String],
) -> Result<i32> {
    let (name, args) = program.split_first().context("No program given")?;
    let props: PropertyMap = properties.iter().cloned().collect();

    let result = exec
        .run_timed_future(Some(&props), async {
            match tokio::process::Command::new(name).args(args).status().await {
                Ok(status) if status.success() => Ok(status),
                Ok(status) => Err(ChildError::Exit(status)),
                Err(source) => Err(ChildError::Spawn {
                    program: name.clone(),
                    source,
                }),
            }
        })
        .await;

    Ok(match result {
        Ok(_) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "Timed command failed");
            e.exit_code()
        }
    })
}

/// Describe the configuration, with optional identifier overrides.
pub fn info(
    config: &MinLogConfig,
    config_id: Option<String>,
    connection_id: Option<String>,
) -> String {
    let mut config = config.clone();
    if let Some(id) = config_id {
        config.config_id = id;
    }
    let connection = connection_id
        .map(ConnectionInfo::new)
        .unwrap_or_else(|| config.connection.clone());
    retrieve_info(&config, &connection)
}
