//! Diagnostic logging setup
//!
//! Log lines go to stderr so stdout only carries command results. An
//! explicit filter in `PROCMEM_LOG` wins over the -v/-q flags.

use std::env;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Maps the command-line flags to a maximum log level.
pub fn level_for(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = match env::var(LOG_ENV_VAR) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::try_new(spec.trim())
            .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity, quiet).as_str())),
        _ => EnvFilter::new(level_for(verbosity, quiet).as_str()),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, false), Level::WARN);
        assert_eq!(level_for(1, false), Level::INFO);
        assert_eq!(level_for(2, false), Level::DEBUG);
        assert_eq!(level_for(3, false), Level::TRACE);
        assert_eq!(level_for(9, false), Level::TRACE);
    }

    #[test]
    fn test_quiet_wins() {
        assert_eq!(level_for(3, true), Level::ERROR);
    }

    #[test]
    fn test_init_twice() {
        init(0, false);
        init(2, false);
    }
}
