/*!
 * Adaptive Spin-Wait Strategy
 *
 * Optimized for low-latency scenarios where waits are typically very short.
 * Spins for a while before falling back to parking.
 */

use super::condvar::CondvarWait;
use super::traits::{WaitStrategy, WakeResult};
use crate::core::limits::{DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION, SPIN_YIELD_INTERVAL};
use std::thread;
use std::time::{Duration, Instant};

/// Adaptive spin-wait strategy
///
/// # Performance
///
/// - Ultra-low latency for short waits (< 10µs)
/// - Higher CPU usage during wait
/// - Falls back to condvar for long waits
///
/// # Use Cases
///
/// Best for scenarios where:
/// - Workers reach a rendezvous within microseconds of each other
/// - Low latency is critical
/// - CPU usage is acceptable trade-off
pub struct SpinWait {
    /// Fallback condvar for long waits
    fallback: CondvarWait,
    /// Spin duration before falling back
    spin_duration: Duration,
    /// Maximum spin iterations
    max_spins: u32,
}

impl SpinWait {
    /// Create a new adaptive spin-wait strategy
    pub fn new(spin_duration: Duration, max_spins: u32) -> Self {
        Self {
            fallback: CondvarWait::new(),
            spin_duration,
            max_spins,
        }
    }

    /// Create with default parameters
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SPIN_DURATION, DEFAULT_MAX_SPINS)
    }

    /// Perform adaptive spinning
    ///
    /// Returns true as soon as `ready` holds, false once the spin budget
    /// or the deadline is exhausted.
    fn spin(&self, ready: &mut dyn FnMut() -> bool, deadline: Option<Instant>) -> bool {
        let start = Instant::now();
        let mut spin_count = 0;

        loop {
            if ready() {
                return true;
            }

            if start.elapsed() >= self.spin_duration || spin_count >= self.max_spins {
                return false;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return false;
            }

            // Yield to scheduler occasionally
            if spin_count % SPIN_YIELD_INTERVAL == 0 {
                thread::yield_now();
            } else {
                std::hint::spin_loop();
            }

            spin_count += 1;
        }
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WaitStrategy for SpinWait {
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool, deadline: Option<Instant>) -> bool {
        if self.spin(ready, deadline) {
            return true;
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            return ready();
        }

        // Fall back to condvar for longer waits
        self.fallback.wait_until(ready, deadline)
    }

    fn wake_one(&self) -> WakeResult {
        self.fallback.wake_one()
    }

    fn wake_all(&self) -> WakeResult {
        self.fallback.wake_all()
    }

    fn waiter_count(&self) -> usize {
        self.fallback.waiter_count()
    }

    fn name(&self) -> &'static str {
        "spinwait"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_spinwait_satisfied_while_spinning() {
        let spin = SpinWait::new(Duration::from_millis(10), 10_000);
        let polls = AtomicU32::new(0);

        let result = spin.wait_until(&mut || polls.fetch_add(1, Ordering::Relaxed) >= 5, None);

        assert!(result);
        assert_eq!(spin.waiter_count(), 0);
    }

    #[test]
    fn test_spinwait_falls_back_to_parking() {
        let spin = Arc::new(SpinWait::new(Duration::from_micros(1), 1));
        let flag = Arc::new(AtomicBool::new(false));

        let handle = {
            let spin = spin.clone();
            let flag = flag.clone();
            thread::spawn(move || spin.wait_until(&mut || flag.load(Ordering::SeqCst), None))
        };

        thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::SeqCst);
        spin.wake_all();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_spinwait_timeout() {
        let spin = SpinWait::with_defaults();
        let start = Instant::now();
        let result = spin.wait_until(&mut || false, Some(start + Duration::from_millis(30)));

        assert!(!result);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
