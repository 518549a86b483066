/*!
 * Core Module
 * Error types, limits, and the wait/notify layer shared by every primitive
 */

pub mod errors;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
