//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init() {
    init_with_filter("info");
}

/// Initialize the logging system with a default filter such as `"debug"` or
/// `"gl_toolkit=trace"`
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialized, keeping existing configuration");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_with_filter("debug");
        init();
        info!("logging initialized twice");
    }
}
