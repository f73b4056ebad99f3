//! Command-line arguments for `minlog`.

use clap::{Args, Parser, Subcommand};

use minlog_core::config::parse_pair;
use minlog_core::MinLogConfig;

/// Derive transaction properties and time commands with structured logging
#[derive(Parser, Debug)]
#[command(name = "minlog", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Emit JSON-formatted log output
    #[arg(long, global = true)]
    pub json: bool,

    /// Tracing filter directive (e.g. "info", "minlog=debug")
    #[arg(long, global = true, env = "MINLOG__LOG_FILTER")]
    pub log_filter: Option<String>,

    /// Logger name recorded on every line
    #[arg(long, global = true, env = "MINLOG__LOGGER")]
    pub logger: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the transaction properties derived from request headers
    Derive {
        /// Inbound header as NAME=VALUE (repeatable)
        #[arg(long = "header", short = 'H', value_parser = parse_pair)]
        headers: Vec<(String, String)>,

        /// Model a call with no request context at all
        #[arg(long, conflicts_with = "headers")]
        no_headers: bool,
    },

    /// Run a command, logging entry and exit with elapsed time
    Timed {
        /// Transaction property as KEY=VALUE (repeatable)
        #[arg(long = "property", short = 'p', value_parser = parse_pair)]
        properties: Vec<(String, String)>,

        /// Program and arguments to run
        #[arg(last = true, required = true)]
        program: Vec<String>,
    },

    /// Describe the active configuration and connection
    Info {
        /// Configuration identifier
        #[arg(long, env = "MINLOG__CONFIG_ID")]
        config_id: Option<String>,

        /// Connection identifier
        #[arg(long, env = "MINLOG__CONNECTION_ID")]
        connection_id: Option<String>,
    },
}

impl GlobalArgs {
    /// Layer command-line options over a base configuration
    pub fn apply(&self, mut config: MinLogConfig) -> MinLogConfig {
        if self.json {
            config.json = true;
        }
        if let Some(filter) = &self.log_filter {
            config.log_filter = filter.clone();
        }
        if let Some(logger) = &self.logger {
            config.logger = logger.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_derive_headers() {
        let cli = Cli::try_parse_from([
            "minlog",
            "derive",
            "-H",
            "client_id=abc",
            "--header",
            "x-transaction-id=T1",
        ])
        .unwrap();

        match cli.command {
            Command::Derive { headers, no_headers } => {
                assert!(!no_headers);
                assert_eq!(
                    headers,
                    vec![
                        ("client_id".to_string(), "abc".to_string()),
                        ("x-transaction-id".to_string(), "T1".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_headers_conflicts_with_headers() {
        let result = Cli::try_parse_from(["minlog", "derive", "--no-headers", "-H", "a=b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timed() {
        let cli = Cli::try_parse_from([
            "minlog", "--json", "timed", "-p", "client_id=abc", "--", "sleep", "1",
        ])
        .unwrap();

        assert!(cli.global.json);
        match cli.command {
            Command::Timed { properties, program } => {
                assert_eq!(properties.len(), 1);
                assert_eq!(program, vec!["sleep".to_string(), "1".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_pair_rejected() {
        assert!(Cli::try_parse_from(["minlog", "derive", "-H", "novalue"]).is_err());
    }

    #[test]
    fn test_global_args_apply() {
        let global = GlobalArgs {
            json: true,
            log_filter: Some("debug".to_string()),
            logger: None,
        };
        let config = global.apply(MinLogConfig::default());
        assert!(config.json);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.logger, "minlog");
    }
}
