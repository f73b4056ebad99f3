//! Human-readable identification of the active configuration.

use crate::config::{ConnectionInfo, MinLogConfig};

/// Describe which configuration and connection are in use.
pub fn retrieve_info(config: &MinLogConfig, connection: &ConnectionInfo) -> String {
    format!(
        "Using Configuration [{}] with Connection id [{}]",
        config.config_id, connection.id
    )
}
