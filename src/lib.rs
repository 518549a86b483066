/*!
 * Lazy Rendezvous Library
 * Lazy generators and thread rendezvous primitives
 */

pub mod core;
pub mod monitoring;
pub mod rendezvous;
pub mod sequence;

// Re-exports
pub use crate::core::errors::{SequenceError, SyncError, SyncResult};
pub use crate::core::sync::{StrategyType, SyncConfig};
pub use monitoring::{init_tracing, try_init_tracing};
pub use rendezvous::{Barrier, BinarySemaphore, CountingSemaphore, Latch, PhaseToken};
pub use sequence::{LazySequence, Producer, Step};
