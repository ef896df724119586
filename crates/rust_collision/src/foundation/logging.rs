//! Logging utilities and structured logging support

use crate::core::config::{ConfigError, PhysicsConfig};

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default filter such as `"debug"` or
/// `"rust_collision=trace"`. `RUST_LOG` still takes precedence when set.
pub fn init_with_filter(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

/// Initialize the logging system at the level named in a configuration
pub fn init_from_config(config: &PhysicsConfig) -> Result<(), ConfigError> {
    let level = config.level_filter()?;
    init_with_filter(&level.to_string().to_lowercase());
    Ok(())
}
