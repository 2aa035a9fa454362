//! Subscriber installation for the `mb` binary

use tracing_subscriber::EnvFilter;

/// `debug` when verbose, else `RUST_LOG`, else `configured`, else `warn`
#[must_use]
pub fn env_filter(verbose: bool, configured: &str) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER))
}

/// Log to stderr so stdout carries only command output
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is kept.
pub fn init(verbose: bool, configured: &str) -> bool {
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "keeping existing subscriber");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins() {
        assert_eq!(env_filter(true, "error").to_string(), "debug");
    }

    #[test]
    fn second_init_keeps_first_subscriber() {
        init(false, "warn");
        assert!(!init(true, "debug"));
    }

    #[test]
    fn invalid_configured_filter_falls_back() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter(false, "mb_io=loud").to_string(), "warn");
            assert_eq!(env_filter(false, "mb_io=info").to_string(), "mb_io=info");
        }
    }
}
