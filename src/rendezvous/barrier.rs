/*!
 * Barrier
 *
 * Reusable N-way rendezvous split into phases. The arrival that completes a
 * phase runs the completion action, resets the count, and advances the phase
 * before any waiter of that phase is released.
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::BARRIER_MAX;
use crate::core::sync::{SyncConfig, WaitQueue};
use crate::monitoring::WaitSpan;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, trace};

type CompletionFn = Box<dyn FnMut() + Send>;

struct BarrierState {
    remaining: usize,
    capacity: usize,
    phase: u64,
    completion: Option<CompletionFn>,
}

/// Token identifying the phase an arrival belongs to
#[must_use = "pass the token to Barrier::wait to block until its phase completes"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseToken {
    phase: u64,
    completed: bool,
}

impl PhaseToken {
    /// Phase this arrival was counted in
    #[inline]
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// True for exactly one arrival per phase: the one that completed it
    #[inline]
    pub fn completed_phase(&self) -> bool {
        self.completed
    }
}

/// Reusable multi-phase barrier
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::Barrier;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::thread;
///
/// let rounds = Arc::new(AtomicUsize::new(0));
/// let counter = rounds.clone();
/// let barrier = Barrier::with_completion(3, move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// })
/// .unwrap();
///
/// thread::scope(|s| {
///     for _ in 0..3 {
///         s.spawn(|| {
///             barrier.arrive_and_wait(1).unwrap();
///             barrier.arrive_and_wait(1).unwrap();
///         });
///     }
/// });
/// assert_eq!(rounds.load(Ordering::SeqCst), 2);
/// ```
pub struct Barrier {
    state: Mutex<BarrierState>,
    /// Mirror of `state.phase`, published after the completion action ran
    phase: AtomicU64,
    waiters: WaitQueue,
}

impl Barrier {
    /// Create a barrier for `capacity` participants
    pub fn new(capacity: usize) -> SyncResult<Self> {
        Self::build(capacity, None, SyncConfig::default())
    }

    /// Create a barrier that runs `completion` once per completed phase
    ///
    /// The action runs on the completing thread while the barrier is locked;
    /// it must not call back into this barrier.
    ///
    /// # Panics
    ///
    /// The completion must not panic. A panic unwinds out of the arrival that
    /// completed the phase, and the phase never advances: its waiters stay
    /// blocked and every later arrival is rejected with
    /// [`SyncError::BarrierOverflow`].
    pub fn with_completion<F>(capacity: usize, completion: F) -> SyncResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        Self::build(capacity, Some(Box::new(completion)), SyncConfig::default())
    }

    /// Create a barrier with an explicit wait configuration
    pub fn with_config(capacity: usize, config: SyncConfig) -> SyncResult<Self> {
        Self::build(capacity, None, config)
    }

    /// Create a barrier with both a completion action and a wait configuration
    ///
    /// The completion must not panic; see [`Barrier::with_completion`].
    pub fn with_completion_and_config<F>(
        capacity: usize,
        completion: F,
        config: SyncConfig,
    ) -> SyncResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        Self::build(capacity, Some(Box::new(completion)), config)
    }

    fn build(capacity: usize, completion: Option<CompletionFn>, config: SyncConfig) -> SyncResult<Self> {
        if capacity == 0 || capacity > BARRIER_MAX {
            return Err(SyncError::InvalidCapacity {
                requested: capacity,
                max: BARRIER_MAX,
            });
        }

        Ok(Self {
            state: Mutex::new(BarrierState {
                remaining: capacity,
                capacity,
                phase: 0,
                completion,
            }),
            phase: AtomicU64::new(0),
            waiters: WaitQueue::new(config),
        })
    }

    /// Maximum capacity supported by the implementation
    #[inline]
    pub const fn max() -> usize {
        BARRIER_MAX
    }

    /// Arrivals required per phase (shrinks with `arrive_and_drop`)
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Arrivals still missing in the current phase
    pub fn remaining(&self) -> usize {
        self.state.lock().remaining
    }

    /// Number of completed phases
    #[inline]
    pub fn phase(&self) -> u64 {
        self.phase.load(Ordering::Acquire)
    }

    /// Count `n` arrivals in the current phase without blocking
    pub fn arrive(&self, n: usize) -> SyncResult<PhaseToken> {
        let mut state = self.state.lock();
        self.arrive_locked(&mut state, n)
    }

    /// Block until the phase identified by `token` has completed
    pub fn wait(&self, token: PhaseToken) {
        if self.phase_passed(token) {
            return;
        }
        let _span = WaitSpan::new("barrier");
        self.waiters.wait_while(|| !self.phase_passed(token));
    }

    /// Arrive and block until the current phase completes
    pub fn arrive_and_wait(&self, n: usize) -> SyncResult<PhaseToken> {
        let token = self.arrive(n)?;
        self.wait(token);
        Ok(token)
    }

    /// Arrive once and leave the cohort for all later phases
    pub fn arrive_and_drop(&self) -> SyncResult<PhaseToken> {
        let mut state = self.state.lock();
        if state.remaining == 0 {
            return Err(self.overflow(&state, 1));
        }

        state.capacity -= 1;
        debug!(
            capacity = state.capacity,
            phase = state.phase,
            "Barrier participant dropped"
        );
        self.arrive_locked(&mut state, 1)
    }

    #[inline]
    fn phase_passed(&self, token: PhaseToken) -> bool {
        self.phase.load(Ordering::SeqCst) > token.phase
    }

    fn arrive_locked(&self, state: &mut BarrierState, n: usize) -> SyncResult<PhaseToken> {
        if n > state.remaining {
            return Err(self.overflow(state, n));
        }

        state.remaining -= n;
        let phase = state.phase;
        trace!(phase, remaining = state.remaining, "Barrier arrival");

        if state.remaining > 0 || n == 0 {
            return Ok(PhaseToken {
                phase,
                completed: false,
            });
        }

        // Phase complete: the action happens-before publishing the new phase
        if let Some(completion) = state.completion.as_mut() {
            completion();
        }
        state.remaining = state.capacity;
        state.phase += 1;
        self.phase.store(state.phase, Ordering::SeqCst);

        let woken = self.waiters.wake_all();
        debug!(phase, woken = woken.count(), "Barrier phase completed");

        Ok(PhaseToken {
            phase,
            completed: true,
        })
    }

    fn overflow(&self, state: &BarrierState, n: usize) -> SyncError {
        error!(
            requested = n,
            remaining = state.remaining,
            phase = state.phase,
            "Barrier arrival overflow rejected"
        );
        SyncError::BarrierOverflow {
            requested: n,
            remaining: state.remaining,
            phase: state.phase,
        }
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Barrier")
            .field("remaining", &state.remaining)
            .field("capacity", &state.capacity)
            .field("phase", &state.phase)
            .field("has_completion", &state.completion.is_some())
            .finish()
    }
}
