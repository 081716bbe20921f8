//! File sinks with size-based rotation and age-based retention
//!
//! The rotation check runs synchronously before every append; retention
//! cleanup runs after each successful rotation.

mod retention;
mod rotating;

pub use retention::{cleanup_old_archives, DEFAULT_KEEP_DAYS};
pub use rotating::{RotatingSink, RotationPolicy, DEFAULT_MAX_SIZE_BYTES};
