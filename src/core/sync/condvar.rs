/*!
 * Condvar-Based Wait Strategy
 *
 * Cross-platform fallback using parking_lot::Condvar for reliability
 */

use super::traits::{WaitStrategy, WakeResult};
use parking_lot::{Condvar, Mutex};
use std::time::Instant;

/// Condvar-based wait strategy
///
/// The mutex guards no data of its own; it orders predicate checks against
/// wakes so that no notification is lost.
///
/// # Performance
///
/// - Slightly more overhead than futex
/// - Works on all platforms
/// - Reliable and well-tested
pub struct CondvarWait {
    lock: Mutex<usize>,
    condvar: Condvar,
}

impl CondvarWait {
    /// Create a new condvar-based wait strategy
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }
}

impl Default for CondvarWait {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for CondvarWait {
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool, deadline: Option<Instant>) -> bool {
        if ready() {
            return true;
        }

        let mut waiters = self.lock.lock();
        loop {
            if ready() {
                return true;
            }

            *waiters += 1;
            let timed_out = match deadline {
                Some(deadline) => self.condvar.wait_until(&mut waiters, deadline).timed_out(),
                None => {
                    self.condvar.wait(&mut waiters);
                    false
                }
            };
            *waiters -= 1;

            if timed_out {
                // Last look: the state may have changed right at the deadline
                return ready();
            }
        }
    }

    fn wake_one(&self) -> WakeResult {
        // Taking the lock orders this wake after any in-progress predicate check
        let waiters = self.lock.lock();
        if *waiters == 0 {
            return WakeResult::NoWaiters;
        }
        drop(waiters);
        WakeResult::from_count(self.condvar.notify_one() as usize)
    }

    fn wake_all(&self) -> WakeResult {
        let waiters = self.lock.lock();
        if *waiters == 0 {
            return WakeResult::NoWaiters;
        }
        drop(waiters);
        WakeResult::from_count(self.condvar.notify_all())
    }

    fn waiter_count(&self) -> usize {
        *self.lock.lock()
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_condvar_wake_all() {
        let cv = Arc::new(CondvarWait::new());
        let flag = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let cv = cv.clone();
                let flag = flag.clone();
                thread::spawn(move || {
                    cv.wait_until(&mut || flag.load(Ordering::SeqCst), None)
                })
            })
            .collect();

        // Give threads time to wait
        thread::sleep(Duration::from_millis(50));

        flag.store(true, Ordering::SeqCst);
        cv.wake_all();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cv.waiter_count(), 0);
    }

    #[test]
    fn test_condvar_timeout() {
        let cv = CondvarWait::new();
        let start = Instant::now();
        let result = cv.wait_until(&mut || false, Some(start + Duration::from_millis(50)));

        assert!(!result); // Should timeout
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_condvar_ready_skips_parking() {
        let cv = CondvarWait::new();
        assert!(cv.wait_until(&mut || true, None));
        assert_eq!(cv.wake_one(), WakeResult::NoWaiters);
    }
}
