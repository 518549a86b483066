/*!
 * Rendezvous Primitives
 *
 * Thread-coordination counters:
 * - `Latch`: one-shot countdown
 * - `Barrier`: reusable multi-phase rendezvous with completion action
 * - `CountingSemaphore` / `BinarySemaphore`: bounded permit counters
 *
 * All blocking goes through `core::sync::WaitQueue`, so every primitive can
 * be tuned with a `SyncConfig`.
 */

mod barrier;
mod latch;
mod semaphore;

pub use barrier::{Barrier, PhaseToken};
pub use latch::Latch;
pub use semaphore::{BinarySemaphore, CountingSemaphore};
