use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LogSection;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
/// Logs go to stderr so command output stays machine-readable.
pub fn init(log: &LogSection) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)
            .with_context(|| format!("invalid log level/filter '{}'", log.level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("telemetry error: {e}"))
}
