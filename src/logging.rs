//! Diagnostic logging setup.
//!
//! Library code logs through the `log` facade; binaries call
//! [`init_logging`] once to route records to stderr via `env_logger`.

use env_logger::Env;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the stderr logger. Safe to call more than once.
pub fn init_logging() {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("logging initialized twice without panicking");
    }
}
