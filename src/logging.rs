// ==========================================
// Logging bootstrap
// ==========================================
// tracing + tracing-subscriber
// RUST_LOG overrides the crate-scoped default below
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when RUST_LOG is unset: this crate at info, dependencies at warn
pub const DEFAULT_FILTER: &str = "warn,agro_asociados=info";

/// Filter for test runs
pub const TEST_FILTER: &str = "warn,agro_asociados=debug";

fn filter_from_env_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialise the global subscriber.
///
/// # Environment
/// - RUST_LOG: filter directive (default: `DEFAULT_FILTER`)
///   e.g. RUST_LOG=agro_asociados::importer=trace
///
/// # Example
/// ```no_run
/// use agro_asociados::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(filter_from_env_or(DEFAULT_FILTER))
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Initialise logging for tests, captured by the test harness.
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(filter_from_env_or(TEST_FILTER))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        for directive in [DEFAULT_FILTER, TEST_FILTER] {
            let filter = EnvFilter::try_new(directive).unwrap();
            assert!(filter.to_string().contains("agro_asociados="));
        }
    }
}
