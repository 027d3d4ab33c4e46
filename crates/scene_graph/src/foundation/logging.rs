//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honors `RUST_LOG`, defaulting to `info`. Panics if a logger is already
/// installed; use [`try_init`] when that cannot be ruled out.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Initialize the logging system, tolerating an already installed logger
///
/// Returns `false` when another logger was installed first.
pub fn try_init() -> bool {
    env_logger::builder().is_test(cfg!(test)).try_init().is_ok()
}
