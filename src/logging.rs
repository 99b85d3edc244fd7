//! Tracing setup shared by every process embedding the check-in core.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global subscriber
///
/// `RUST_LOG` overrides `settings.level`. Formats: `json` (default),
/// `pretty`, `compact`. Fails if a subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.format.as_str() {
        "pretty" => subscriber.pretty().try_init(),
        "compact" => subscriber.compact().try_init(),
        _ => subscriber.json().try_init(),
    }
}

/// Initialize logging for testing (captures logs for test output)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        init_test();
        assert!(init(&LoggingSettings::default()).is_err());
    }
}
