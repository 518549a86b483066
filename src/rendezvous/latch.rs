/*!
 * Latch
 *
 * One-shot countdown gate. Once the count reaches zero it stays there and
 * every current and future waiter passes.
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::LATCH_MAX;
use crate::core::sync::{SyncConfig, WaitQueue};
use crate::monitoring::WaitSpan;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};

/// One-shot countdown latch
///
/// Counting down never blocks; waiting blocks until the count is zero.
///
/// # Underflow
///
/// Counting down by more than remains clamps the count to zero, opens the
/// latch, and returns [`SyncError::LatchUnderflow`].
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::Latch;
/// use std::thread;
///
/// let latch = Latch::new(3).unwrap();
/// thread::scope(|s| {
///     for _ in 0..3 {
///         s.spawn(|| latch.count_down(1).unwrap());
///     }
///     latch.wait();
/// });
/// assert!(latch.try_wait());
/// ```
pub struct Latch {
    count: AtomicUsize,
    expected: usize,
    waiters: WaitQueue,
}

impl Latch {
    /// Create a latch that opens after `expected` count-downs
    ///
    /// Fails with [`SyncError::InvalidCapacity`] if `expected` exceeds
    /// [`Latch::max`].
    pub fn new(expected: usize) -> SyncResult<Self> {
        Self::with_config(expected, SyncConfig::default())
    }

    /// Create a latch with an explicit wait configuration
    pub fn with_config(expected: usize, config: SyncConfig) -> SyncResult<Self> {
        if expected > LATCH_MAX {
            return Err(SyncError::InvalidCapacity {
                requested: expected,
                max: LATCH_MAX,
            });
        }

        Ok(Self {
            count: AtomicUsize::new(expected),
            expected,
            waiters: WaitQueue::new(config),
        })
    }

    /// Maximum count supported by the implementation
    #[inline]
    pub const fn max() -> usize {
        LATCH_MAX
    }

    /// Count the latch was created with
    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Current count (a snapshot; may change immediately)
    #[inline]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Decrease the count by `n` without blocking
    ///
    /// The call that brings the count to zero wakes every waiter.
    pub fn count_down(&self, n: usize) -> SyncResult<()> {
        if n == 0 {
            return Ok(());
        }

        let mut current = self.count.load(Ordering::Acquire);
        loop {
            let next = current.saturating_sub(n);
            match self.count.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        if current != 0 && current <= n {
            let woken = self.waiters.wake_all();
            debug!(expected = self.expected, woken = woken.count(), "Latch opened");
        }

        if n > current {
            error!(
                requested = n,
                remaining = current,
                "Latch count_down underflow, clamped to zero"
            );
            return Err(SyncError::LatchUnderflow {
                requested: n,
                remaining: current,
            });
        }

        Ok(())
    }

    /// Block until the count reaches zero
    pub fn wait(&self) {
        if self.try_wait() {
            return;
        }
        let _span = WaitSpan::new("latch");
        self.waiters.wait_while(|| self.count.load(Ordering::SeqCst) != 0);
    }

    /// Check whether the count is zero without blocking
    ///
    /// A `false` result may be stale by the time the caller acts on it.
    #[inline]
    pub fn try_wait(&self) -> bool {
        self.count.load(Ordering::Acquire) == 0
    }

    /// Count down by `n`, then wait for zero
    ///
    /// On underflow the latch is already open, so the error is returned
    /// without blocking.
    pub fn arrive_and_wait(&self, n: usize) -> SyncResult<()> {
        self.count_down(n)?;
        self.wait();
        Ok(())
    }
}

impl fmt::Debug for Latch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Latch")
            .field("count", &self.count())
            .field("expected", &self.expected)
            .field("waiters", &self.waiters)
            .finish()
    }
}
