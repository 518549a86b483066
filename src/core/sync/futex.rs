/*!
 * Futex-Based Wait Strategy
 *
 * Uses parking_lot_core for futex-like operations on all platforms.
 * On Linux, this maps directly to futex syscalls for minimal overhead.
 *
 * # Design
 *
 * Each strategy owns one heap-allocated parking word whose address is the
 * parking key. The predicate runs inside `park`'s validate callback, which
 * holds the bucket lock that `unpark_*` also takes, so a wake can never slip
 * between the check and the sleep.
 */

use super::traits::{WaitStrategy, WakeResult};
use parking_lot_core::{park, unpark_all, unpark_one, ParkResult, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Futex-based wait strategy
///
/// # Performance
///
/// - Zero allocations after initialization
/// - Direct futex syscalls on Linux
/// - Lock-free fast path
///
/// Predicates passed to this strategy run under a parking_lot bucket lock:
/// they must only touch atomics, never block.
pub struct FutexWait {
    /// Boxed so the parking address survives moves of the strategy
    waiters: Box<AtomicUsize>,
}

impl FutexWait {
    /// Create a new futex-based wait strategy
    pub fn new() -> Self {
        Self {
            waiters: Box::new(AtomicUsize::new(0)),
        }
    }

    /// Stable parking address
    #[inline]
    fn key(&self) -> usize {
        &*self.waiters as *const AtomicUsize as usize
    }
}

impl Default for FutexWait {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for FutexWait {
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool, deadline: Option<Instant>) -> bool {
        let key = self.key();

        loop {
            if ready() {
                return true;
            }

            let mut satisfied = false;
            self.waiters.fetch_add(1, Ordering::Relaxed);

            // SAFETY: the key is the address of a live allocation owned by
            // self, and no callback panics or calls back into parking_lot_core.
            let result = unsafe {
                park(
                    key,
                    || {
                        satisfied = ready();
                        !satisfied
                    },
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    deadline,
                )
            };

            self.waiters.fetch_sub(1, Ordering::Relaxed);

            if satisfied {
                return true;
            }
            match result {
                ParkResult::TimedOut => return ready(),
                // Woken or validation lost a race; re-check
                ParkResult::Unparked(_) | ParkResult::Invalid => {}
            }
        }
    }

    fn wake_one(&self) -> WakeResult {
        // SAFETY: see wait_until
        let result = unsafe { unpark_one(self.key(), |_| DEFAULT_UNPARK_TOKEN) };
        WakeResult::from_count(result.unparked_threads)
    }

    fn wake_all(&self) -> WakeResult {
        // SAFETY: see wait_until
        let unparked = unsafe { unpark_all(self.key(), DEFAULT_UNPARK_TOKEN) };
        WakeResult::from_count(unparked)
    }

    fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_futex_wake_one() {
        let futex = Arc::new(FutexWait::new());
        let flag = Arc::new(AtomicBool::new(false));

        let handle = {
            let futex = futex.clone();
            let flag = flag.clone();
            thread::spawn(move || {
                futex.wait_until(
                    &mut || flag.load(Ordering::SeqCst),
                    Some(Instant::now() + Duration::from_secs(5)),
                )
            })
        };

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));

        flag.store(true, Ordering::SeqCst);
        futex.wake_one();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_futex_timeout() {
        let futex = FutexWait::new();
        let start = Instant::now();
        let result = futex.wait_until(&mut || false, Some(start + Duration::from_millis(50)));

        assert!(!result);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_futex_wake_without_waiters() {
        let futex = FutexWait::new();
        assert_eq!(futex.wake_all(), WakeResult::NoWaiters);
        assert_eq!(futex.waiter_count(), 0);
    }
}
