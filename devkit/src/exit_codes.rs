//! Stable exit codes for devkit CLI commands.
//!
//! When an external tool (meson, a built executable) fails, devkit exits
//! with that tool's own exit code instead; see [`for_error`].

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed for a reason other than a failing external tool
/// (invalid config, missing directory, unknown example, ...).
pub const FAILED: i32 = 1;

/// Exit code for a failed command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    crate::io::process::tool_exit_code(err).unwrap_or(FAILED)
}
