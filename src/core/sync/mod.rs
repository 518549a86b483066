/*!
 * Synchronization Primitives
 *
 * Wait/notify layer used by the latch, barrier, and semaphore:
 * - Futex-based (parking_lot_core) for minimal overhead
 * - Condvar-based (cross-platform) for reliability
 * - Adaptive spinwait for low-latency scenarios
 *
 * # Architecture
 *
 * A `WaitQueue` blocks callers until a readiness predicate over the owning
 * primitive's atomics holds. The strategy is chosen once from `SyncConfig`.
 */

mod condvar;
mod config;
mod futex;
mod spinwait;
mod traits;
mod wait;

pub use config::{StrategyType, SyncConfig};
pub use traits::{WaitStrategy, WakeResult};
pub use wait::WaitQueue;

// Re-export specific strategies for advanced users
pub use condvar::CondvarWait;
pub use futex::FutexWait;
pub use spinwait::SpinWait;
