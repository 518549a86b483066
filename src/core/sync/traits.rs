/*!
 * Synchronization Traits
 *
 * Core abstraction for predicate-driven wait/notify.
 *
 * # Design: Predicate Checked Under the Parking Lock
 *
 * Every strategy re-evaluates the caller's readiness predicate while holding
 * whatever lock the waker must also take. A state change published before
 * `wake_*` is therefore always observed, either by the predicate or by the
 * wake itself.
 */

use std::time::Instant;

/// Result of a wake operation
///
/// Compact representation (single usize) for efficient returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Build from a raw count of woken threads
    #[inline(always)]
    pub fn from_count(n: usize) -> Self {
        if n == 0 {
            WakeResult::NoWaiters
        } else {
            WakeResult::Woken(n)
        }
    }

    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// Strategy for blocking until a condition holds
///
/// Implementations must be:
/// - **Thread-safe**: Safe to call from multiple threads
/// - **Lossless**: A wake issued after the predicate became true reaches
///   every thread that evaluated it as false
///
/// The predicate may have side effects (a semaphore decrements inside it);
/// once it returns `true` the strategy must return without calling it again.
pub trait WaitStrategy: Send + Sync {
    /// Block until `ready` returns `true` or `deadline` passes
    ///
    /// Returns `true` if the predicate was satisfied, `false` on timeout.
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool, deadline: Option<Instant>) -> bool;

    /// Wake one blocked thread
    fn wake_one(&self) -> WakeResult;

    /// Wake every blocked thread
    fn wake_all(&self) -> WakeResult;

    /// Wake up to `n` blocked threads
    fn wake_n(&self, n: usize) -> WakeResult {
        let mut woken = 0;
        for _ in 0..n {
            match self.wake_one() {
                WakeResult::Woken(k) => woken += k,
                WakeResult::NoWaiters => break,
            }
        }
        WakeResult::from_count(woken)
    }

    /// Get approximate count of blocked threads (for diagnostics)
    fn waiter_count(&self) -> usize {
        0 // Default: unknown
    }

    /// Get strategy name for debugging
    fn name(&self) -> &'static str;
}
