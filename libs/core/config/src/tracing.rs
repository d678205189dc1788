use crate::Environment;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main(), before any fallible operations, to ensure
/// colored error output. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware configuration.
///
/// - **Production** (`APP_ENV=production`): JSON format for log aggregation,
///   module targets hidden, default level `info`.
/// - **Development** (default): pretty-printed format, default level `debug`.
///
/// Both modes include `tracing-error`'s `ErrorLayer` so span traces are
/// captured when errors occur, and honor `RUST_LOG` overrides.
///
/// Safe to call multiple times; subsequent calls are no-ops (common in tests).
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,tower_http=info")
        } else {
            EnvFilter::new("debug,tower_http=debug")
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    if result.is_err() {
        debug!("Tracing already initialized, skipping re-initialization");
    }
}
