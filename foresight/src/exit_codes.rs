//! Stable exit codes for foresight CLI commands.

/// Command succeeded; for `run`, every delivery was made.
pub const OK: i32 = 0;
/// Command failed due to invalid config, world parameters or other errors.
pub const INVALID: i32 = 1;
/// `run` stopped before every delivery was made (exhausted or cycle limit).
pub const INCOMPLETE: i32 = 2;
