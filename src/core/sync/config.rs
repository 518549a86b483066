/*!
 * Synchronization Configuration
 *
 * Runtime configuration for wait strategy selection
 */

use crate::core::limits::{
    DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION, ENV_SPIN_US, ENV_STRATEGY, LONG_WAIT_MAX_SPINS,
    LONG_WAIT_SPIN_DURATION, LOW_LATENCY_MAX_SPINS, LOW_LATENCY_SPIN_DURATION,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Futex-based (parking_lot_core address parking, fastest)
    Futex,
    /// Condvar-based (cross-platform, reliable)
    Condvar,
    /// Adaptive spinwait (low-latency, high-CPU for short waits)
    SpinWait,
    /// Auto-select based on platform
    Auto,
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "futex" => Ok(StrategyType::Futex),
            "condvar" => Ok(StrategyType::Condvar),
            "spin" | "spinwait" => Ok(StrategyType::SpinWait),
            "auto" => Ok(StrategyType::Auto),
            other => Err(format!("unknown wait strategy '{}'", other)),
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin duration before parking (for SpinWait)
    pub spin_duration: Duration,
    /// Maximum spin iterations before giving up
    pub max_spins: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl SyncConfig {
    /// Configuration optimized for low-latency (< 1ms wait expected)
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_duration: LOW_LATENCY_SPIN_DURATION,
            max_spins: LOW_LATENCY_MAX_SPINS,
        }
    }

    /// Configuration optimized for long waits (> 1ms expected)
    pub const fn long_wait() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: LONG_WAIT_SPIN_DURATION,
            max_spins: LONG_WAIT_MAX_SPINS,
        }
    }

    /// Build from environment, falling back to defaults
    ///
    /// Environment variables:
    /// - RENDEZVOUS_STRATEGY: futex | condvar | spin | auto (default: auto)
    /// - RENDEZVOUS_SPIN_US: spin duration in microseconds
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_STRATEGY) {
            match raw.parse() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_STRATEGY),
            }
        }

        if let Some(raw) = lookup(ENV_SPIN_US) {
            match raw.trim().parse::<u64>() {
                Ok(us) => config.spin_duration = Duration::from_micros(us),
                Err(e) => warn!(error = %e, value = %raw, "Ignoring {}", ENV_SPIN_US),
            }
        }

        config
    }

    /// Select best strategy for current platform
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => {
                // Prefer futex on Linux, condvar elsewhere
                #[cfg(target_os = "linux")]
                {
                    StrategyType::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    StrategyType::Condvar
                }
            }
            other => other,
        }
    }
}
