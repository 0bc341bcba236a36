//! Tracing initialisation.
//!
//! `RUST_LOG` takes precedence over the configured level, so
//! `RUST_LOG=rust_seismo::session=trace` works without touching the config
//! file.

use crate::config::Settings;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber described by `settings`.
///
/// Returns `false` if a subscriber was already installed (e.g. by a test
/// harness); that is not treated as an error.
pub fn init_from_config(settings: &Settings) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if settings.application.log_format == "json" {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(
            level = %settings.application.log_level,
            format = %settings.application.log_format,
            "Tracing initialised"
        );
    }
    installed
}

/// `RUST_LOG` if set and valid, otherwise the configured level.
pub fn env_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.application.log_level))
}
