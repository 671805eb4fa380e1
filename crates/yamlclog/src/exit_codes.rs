//! Exit codes for the CLI

use yamlclog_core::YamlclogError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Invalid fragments or nothing to render
pub const VALIDATION_ERROR: i32 = 5;

/// Map a command error to the process exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<YamlclogError>() {
        Some(e) if e.is_config() => CONFIG_ERROR,
        Some(e) if e.is_validation() => VALIDATION_ERROR,
        _ => ERROR,
    }
}
