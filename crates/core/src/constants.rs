//! Shared constants for the settings screen

use std::time::Duration;

/// Delay between reverting the staged batch and resetting keys to their
/// defaults, so the revert's change notifications land first
pub const RESET_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Upper bound for numeric keys that declare no range
pub const DEFAULT_NUMERIC_MAX: f64 = 10_000_000_000.0;

/// Step of spin buttons editing integer keys
pub const INTEGER_STEP: f64 = 1.0;

/// Step of spin buttons editing floating point keys
pub const FLOAT_STEP: f64 = 0.1;

pub const BYTES_PER_KB: u64 = 1024;
pub const BYTES_PER_MB: u64 = 1024 * BYTES_PER_KB;
pub const BYTES_PER_GB: u64 = 1024 * BYTES_PER_MB;
pub const BYTES_PER_TB: u64 = 1024 * BYTES_PER_GB;
