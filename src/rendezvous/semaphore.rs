/*!
 * Semaphore
 *
 * Counting semaphore with a compile-time maximum. Permits are not tied to
 * threads: any thread may release what another acquired.
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::sync::{SyncConfig, WaitQueue};
use crate::monitoring::WaitSpan;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, trace};

/// Counting semaphore holding between 0 and `MAX` permits
///
/// # Type Parameters
///
/// - `MAX`: Largest permit count (compile-time constant)
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::CountingSemaphore;
///
/// let sem = CountingSemaphore::<10>::new(3).unwrap();
/// sem.acquire();
/// assert_eq!(sem.available(), 2);
/// sem.release(1).unwrap();
/// assert_eq!(sem.available(), 3);
/// ```
pub struct CountingSemaphore<const MAX: usize> {
    permits: AtomicUsize,
    waiters: WaitQueue,
}

/// Semaphore with a single permit
pub type BinarySemaphore = CountingSemaphore<1>;

impl<const MAX: usize> CountingSemaphore<MAX> {
    /// Create a semaphore holding `initial` permits
    pub fn new(initial: usize) -> SyncResult<Self> {
        Self::with_config(initial, SyncConfig::default())
    }

    /// Create a semaphore with an explicit wait configuration
    pub fn with_config(initial: usize, config: SyncConfig) -> SyncResult<Self> {
        if initial > MAX {
            return Err(SyncError::SemaphoreOverflow {
                requested: initial,
                available: 0,
                max: MAX,
            });
        }

        Ok(Self {
            permits: AtomicUsize::new(initial),
            waiters: WaitQueue::new(config),
        })
    }

    /// Maximum permit count (compile-time constant)
    #[inline]
    pub const fn max() -> usize {
        MAX
    }

    /// Permits currently available (a snapshot)
    #[inline]
    pub fn available(&self) -> usize {
        self.permits.load(Ordering::Acquire)
    }

    /// Block until a permit is available, then take it
    pub fn acquire(&self) {
        if self.try_acquire() {
            return;
        }
        trace!(max = MAX, "Semaphore acquire blocking");
        let _span = WaitSpan::new("semaphore");
        self.waiters.wait_while(|| !self.try_acquire());
    }

    /// Take a permit if one is available right now
    #[inline]
    pub fn try_acquire(&self) -> bool {
        let mut current = self.permits.load(Ordering::Acquire);
        while current > 0 {
            match self.permits.compare_exchange_weak(
                current,
                current - 1,
                Ordering::SeqCst,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }

    /// Wait at most `timeout` for a permit
    ///
    /// A `false` result does not prove the semaphore was never available.
    pub fn try_acquire_for(&self, timeout: Duration) -> bool {
        if self.try_acquire() {
            return true;
        }
        let _span = WaitSpan::new("semaphore");
        self.waiters.wait_for(|| self.try_acquire(), timeout)
    }

    /// Wait until `deadline` for a permit
    pub fn try_acquire_until(&self, deadline: Instant) -> bool {
        if self.try_acquire() {
            return true;
        }
        let _span = WaitSpan::new("semaphore");
        self.waiters.wait_until(|| self.try_acquire(), deadline)
    }

    /// Return `n` permits and wake up to `n` blocked acquirers
    ///
    /// Releasing beyond `MAX` is rejected and leaves the count unchanged.
    pub fn release(&self, n: usize) -> SyncResult<()> {
        if n == 0 {
            return Ok(());
        }

        let mut current = self.permits.load(Ordering::Acquire);
        loop {
            let next = match current.checked_add(n) {
                Some(next) if next <= MAX => next,
                _ => {
                    error!(
                        requested = n,
                        available = current,
                        max = MAX,
                        "Semaphore release overflow rejected"
                    );
                    return Err(SyncError::SemaphoreOverflow {
                        requested: n,
                        available: current,
                        max: MAX,
                    });
                }
            };

            match self.permits.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        self.waiters.wake_n(n);
        Ok(())
    }
}

impl<const MAX: usize> fmt::Debug for CountingSemaphore<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingSemaphore")
            .field("available", &self.available())
            .field("max", &MAX)
            .field("waiters", &self.waiters)
            .finish()
    }
}
