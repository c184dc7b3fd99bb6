//! Logging setup

use tracing_subscriber::EnvFilter;

use kinesync_core::{KinesyncError, KinesyncResult};

use crate::LoggingConfig;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` overrides `config.filter` when it is set. Fails if the filter
/// does not parse or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> KinesyncResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            KinesyncError::InvalidConfig(format!("log filter {:?}: {}", config.filter, e))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| KinesyncError::InvalidConfig(format!("logging already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "kinesync=notalevel".into(),
            json: false,
        };
        assert!(matches!(
            init_logging(&config),
            Err(KinesyncError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_init_twice_fails() {
        let _ = init_logging(&LoggingConfig::default());
        assert!(init_logging(&LoggingConfig::default()).is_err());
    }
}
