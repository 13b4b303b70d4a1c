//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with command output. The filter comes
//! from `ACTY_LOG` (EnvFilter syntax) and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "ACTY_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `ACTY_LOG`, falling back to `warn` when unset or
/// unparsable.
pub fn env_filter() -> EnvFilter {
    let directives = std::env::var(LOG_ENV).ok();
    filter_from(directives.as_deref())
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_when_unset() {
        assert_eq!(filter_from(None).to_string(), "warn");
        assert_eq!(filter_from(Some("  ")).to_string(), "warn");
    }

    #[test]
    fn test_custom_directives() {
        assert_eq!(filter_from(Some("acty_core=debug")).to_string(), "acty_core=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init();
        init();
    }
}
