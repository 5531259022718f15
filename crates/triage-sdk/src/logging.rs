//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; applications opt in to output by
//! calling [`init_tracing`] once at startup.

use crate::error::{Result, SdkError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor a level is given
pub const DEFAULT_FILTER: &str =
    "triage_sdk=info,triage_runtime=info,triage_repository=info,triage_parser=info";

/// Build the filter directive for a configured level
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return DEFAULT_FILTER.to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!(
        "triage_sdk={level},triage_runtime={level},triage_repository={level},triage_parser={level}"
    )
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a subscriber is already
/// installed.
pub fn init_tracing(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter_directive(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| SdkError::ConfigError(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}
