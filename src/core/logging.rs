//! Internal tracing.
//!
//! stderr is the diagnostics channel read by the host agent, so tracing
//! output is opt-in: a subscriber is only installed when `HOOKWARDEN_LOG`
//! holds a filter directive (e.g. `hookwarden=debug`).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HOOKWARDEN_LOG";

pub fn init() {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return;
    };
    if directive.trim().is_empty() {
        return;
    }
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
