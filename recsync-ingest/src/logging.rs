//! Tracing setup
//!
//! The subscriber is installed before the configuration file is read, so
//! warnings raised while loading and resolving configuration are not lost.
//! The startup level comes from the command line or `RECSYNC_LOG_LEVEL`; once
//! the full configuration is resolved the filter is swapped for the final
//! level through a reload handle. `RUST_LOG` always wins when set.

use recsync_common::config::env_setting;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

use crate::config::ENV_LOG_LEVEL;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Handle for replacing the active filter
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Per-crate directives applied when `RUST_LOG` is unset
pub fn default_directives(level: &str) -> String {
    format!("recsync_ingest={level},recsync_common={level}")
}

/// `RUST_LOG` if set, otherwise [`default_directives`]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Level used before the configuration file is read
///
/// Command line, then `RECSYNC_LOG_LEVEL`, then `info`.
pub fn startup_log_level(cli_level: Option<&str>) -> String {
    cli_level
        .map(str::to_string)
        .or_else(|| env_setting(ENV_LOG_LEVEL))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Reloadable filter layer and its handle
pub fn filter_layer(level: &str) -> (reload::Layer<EnvFilter, Registry>, FilterHandle) {
    reload::Layer::new(env_filter(level))
}

/// Install the global subscriber
pub fn init_tracing(level: &str) -> FilterHandle {
    let (filter, handle) = filter_layer(level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    handle
}

/// Switch the active filter to `level`
pub fn apply_log_level(handle: &FilterHandle, level: &str) {
    if let Err(e) = handle.reload(env_filter(level)) {
        tracing::warn!("Failed to apply log level {}: {}", level, e);
    }
}
