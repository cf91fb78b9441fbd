//! Optional built-in logger.
//!
//! The crate logs through the `log` facade.  Programs that already install a logger see those
//! messages there.  Others can call [`try_init`] to get an `env_logger` that reads its filter
//! from [`LOG_FILTER_ENV`].

use log::SetLoggerError;

/// The environment variable that holds the filter of the built-in logger, in `env_logger`
/// syntax, for example `SYNC_COUNTER_LOG=sync_counter=trace`.
pub const LOG_FILTER_ENV: &str = "SYNC_COUNTER_LOG";

/// Attempt to init an env_logger for the counter crate.
/// Does nothing if the "builtin_env_logger" feature is disabled.
pub fn try_init() -> Result<(), SetLoggerError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "builtin_env_logger")] {
            env_logger::Builder::from_env(
                // By default, only warnings (such as a wait blocked for too long) are shown.
                env_logger::Env::default().filter_or(LOG_FILTER_ENV, "warn"),
            )
            .format_timestamp_micros()
            .try_init()
        } else {
            Ok(())
        }
    }
}

#[cfg(all(test, feature = "builtin_env_logger"))]
mod tests {
    #[test]
    fn test_init_only_once() {
        // The first call may fail if another test installed the logger already.
        let _ = super::try_init();
        assert!(super::try_init().is_err());
    }
}
