/*!
 * Wait Queue
 *
 * High-level abstraction for blocking until a predicate holds.
 * Automatically selects optimal strategy based on platform and configuration.
 */

use super::condvar::CondvarWait;
use super::config::{StrategyType, SyncConfig};
use super::futex::FutexWait;
use super::spinwait::SpinWait;
use super::traits::{WaitStrategy, WakeResult};
use std::fmt;
use std::time::{Duration, Instant};

/// Wait queue backing every rendezvous primitive
///
/// # Performance
///
/// - Strategy selected at creation time
/// - Fast path evaluates the predicate before touching any lock
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::core::sync::{SyncConfig, WaitQueue};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let queue = WaitQueue::new(SyncConfig::default());
/// let open = AtomicBool::new(true);
///
/// // Returns immediately: the predicate already holds
/// queue.wait_while(|| !open.load(Ordering::SeqCst));
/// ```
pub struct WaitQueue {
    strategy: Box<dyn WaitStrategy>,
}

impl WaitQueue {
    /// Create a new wait queue with the specified configuration
    pub fn new(config: SyncConfig) -> Self {
        let strategy: Box<dyn WaitStrategy> = match config.select_strategy() {
            StrategyType::Futex => Box::new(FutexWait::new()),
            StrategyType::Condvar => Box::new(CondvarWait::new()),
            StrategyType::SpinWait => {
                Box::new(SpinWait::new(config.spin_duration, config.max_spins))
            }
            // select_strategy never returns Auto
            StrategyType::Auto => Box::new(CondvarWait::new()),
        };

        Self { strategy }
    }

    /// Create with default configuration (auto-selects best strategy)
    pub fn with_defaults() -> Self {
        Self::new(SyncConfig::default())
    }

    /// Block while `blocked` returns true
    pub fn wait_while<F>(&self, mut blocked: F)
    where
        F: FnMut() -> bool,
    {
        self.strategy.wait_until(&mut || !blocked(), None);
    }

    /// Block until `ready` returns true or the deadline passes
    ///
    /// Returns `true` if the predicate was satisfied.
    pub fn wait_until<F>(&self, mut ready: F, deadline: Instant) -> bool
    where
        F: FnMut() -> bool,
    {
        self.strategy.wait_until(&mut ready, Some(deadline))
    }

    /// Block until `ready` returns true or the timeout elapses
    pub fn wait_for<F>(&self, ready: F, timeout: Duration) -> bool
    where
        F: FnMut() -> bool,
    {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_until(ready, deadline),
            // Timeout too large to represent: wait without one
            None => {
                let mut ready = ready;
                self.strategy.wait_until(&mut ready, None)
            }
        }
    }

    /// Wake one waiter
    pub fn wake_one(&self) -> WakeResult {
        self.strategy.wake_one()
    }

    /// Wake up to `n` waiters
    pub fn wake_n(&self, n: usize) -> WakeResult {
        self.strategy.wake_n(n)
    }

    /// Wake all waiters
    pub fn wake_all(&self) -> WakeResult {
        self.strategy.wake_all()
    }

    /// Get approximate count of waiters (for diagnostics)
    pub fn waiter_count(&self) -> usize {
        self.strategy.waiter_count()
    }

    /// Get the name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

impl Default for WaitQueue {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for WaitQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitQueue")
            .field("strategy", &self.strategy.name())
            .field("waiters", &self.strategy.waiter_count())
            .finish()
    }
}
