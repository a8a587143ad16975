//! Stable exit codes for inspector CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid input, layout, or stored data.
pub const INVALID: i32 = 1;
/// Command requires a signed-in user and none was found.
pub const UNAUTHENTICATED: i32 = 2;
/// The wizard was quit before the inspection was saved.
pub const ABORTED: i32 = 3;
