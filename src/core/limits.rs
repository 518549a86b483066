/*!
 * Limits and Constants
 *
 * Centralized location for counter bounds and wait-tuning defaults.
 * Performance-critical constants are marked with [PERF].
 */

use std::time::Duration;

// =============================================================================
// COUNTER LIMITS
// =============================================================================

/// Largest count a latch accepts at construction
/// Mirrors `std::latch::max()` on 64-bit targets
pub const LATCH_MAX: usize = isize::MAX as usize;

/// Largest capacity a barrier accepts at construction
pub const BARRIER_MAX: usize = isize::MAX as usize;

// =============================================================================
// WAIT TUNING
// =============================================================================

/// Default spin duration before parking
/// [PERF] Covers a typical cross-core wake without burning a timeslice
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default spin iteration cap
pub const DEFAULT_MAX_SPINS: u32 = 100;

/// Spin duration for the low-latency preset
pub const LOW_LATENCY_SPIN_DURATION: Duration = Duration::from_micros(50);

/// Spin iteration cap for the low-latency preset
pub const LOW_LATENCY_MAX_SPINS: u32 = 500;

/// Spin duration for the long-wait preset
pub const LONG_WAIT_SPIN_DURATION: Duration = Duration::from_micros(1);

/// Spin iteration cap for the long-wait preset
pub const LONG_WAIT_MAX_SPINS: u32 = 10;

/// Yield to the scheduler every N spins
/// [PERF] Keeps oversubscribed test machines responsive
pub const SPIN_YIELD_INTERVAL: u32 = 10;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable selecting the wait strategy
pub const ENV_STRATEGY: &str = "RENDEZVOUS_STRATEGY";

/// Environment variable overriding the spin duration in microseconds
pub const ENV_SPIN_US: &str = "RENDEZVOUS_SPIN_US";

/// Environment variable enabling JSON trace output
pub const ENV_TRACE_JSON: &str = "RENDEZVOUS_TRACE_JSON";
