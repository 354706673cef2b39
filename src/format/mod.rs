//! Transfer-format capability detection.
//!
//! The thumbnail service can deliver WebP when the runtime can decode it.
//! Whether it can is a property of the process, not of any one component
//! instance, so the answer is probed once and shared.

pub mod probe;

pub use probe::webp_supported;
