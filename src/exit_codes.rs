//! Exit code constants for the caseforge CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or malformed library file)
//! - 2: Resolution failure (unknown or ambiguous import reference)
//! - 3: Structure failure (empty property, import cycle, invalid pool)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable file, YAML parse error, bad import pattern.
pub const USER_ERROR: i32 = 1;

/// Resolution failure: an import names a config that is missing or duplicated in the library.
pub const RESOLUTION_FAILURE: i32 = 2;

/// Structure failure: a config is malformed in a way expansion cannot proceed from.
pub const STRUCTURE_FAILURE: i32 = 3;
