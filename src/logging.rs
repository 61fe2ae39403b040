// src/logging.rs
// =============================================================================
// Structured logging with tracing.
//
// RUST_LOG, when set, wins over the --log-level flag. The default filter
// also enables request spans from tower_http so every HTTP call is logged.
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("gist_search={level},tower_http={level}").into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }

    tracing::debug!(level = %level, json, "logging initialized");
}
