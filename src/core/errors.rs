/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for rendezvous operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Contract violations reported by the rendezvous primitives
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SyncError {
    #[error("Latch counted down by {requested} with only {remaining} remaining")]
    #[diagnostic(
        code(latch::underflow),
        help("The latch was clamped to zero and opened. Check that every worker counts down once.")
    )]
    LatchUnderflow { requested: usize, remaining: usize },

    #[error("Barrier arrival of {requested} exceeds {remaining} remaining in phase {phase}")]
    #[diagnostic(
        code(barrier::overflow),
        help("More participants arrived than the barrier capacity allows. The arrival was rejected.")
    )]
    BarrierOverflow {
        requested: usize,
        remaining: usize,
        phase: u64,
    },

    #[error("Semaphore release of {requested} with {available} available exceeds maximum {max}")]
    #[diagnostic(
        code(semaphore::overflow),
        help("Release was rejected. Each release should pair with an earlier acquire.")
    )]
    SemaphoreOverflow {
        requested: usize,
        available: usize,
        max: usize,
    },

    #[error("Invalid capacity {requested}: limit is {max}")]
    #[diagnostic(
        code(sync::invalid_capacity),
        help("Barriers need at least one participant; no count may exceed the limit.")
    )]
    InvalidCapacity { requested: usize, max: usize },
}

/// Failure surfaced by a lazy sequence on the pull that triggered it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError<E> {
    #[error("Producer failed: {0}")]
    Producer(E),

    #[error("Producer panicked: {0}")]
    Panicked(String),
}

impl<E> SequenceError<E> {
    /// Check if the producer panicked rather than returning an error
    pub fn is_panic(&self) -> bool {
        matches!(self, SequenceError::Panicked(_))
    }

    /// Get the producer's error, if that is what ended the sequence
    pub fn into_producer_error(self) -> Option<E> {
        match self {
            SequenceError::Producer(e) => Some(e),
            SequenceError::Panicked(_) => None,
        }
    }
}
