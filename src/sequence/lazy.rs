/*!
 * Lazy Sequence
 *
 * Pull-driven handle over a suspended producer.
 *
 * # State Machine
 *
 * ```text
 * NotStarted --resume--> Suspended --resume--> ... --complete/fail--> Done
 * ```
 *
 * No producer code runs until the first pull. At most one produced value is
 * buffered. `Done` is terminal; exhaustion is reported forever after.
 */

use super::producer::Producer;
use super::step::Step;
use crate::core::errors::SequenceError;
use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

/// Result type for sequence pulls
pub type PullResult<T, E> = Result<T, SequenceError<E>>;

/// Type-erased sequence
pub type BoxedSequence<'a, T, E> = LazySequence<Box<dyn Producer<Item = T, Error = E> + 'a>>;

/// Observable lifecycle state of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Created, no producer code has run
    NotStarted,
    /// Suspended after a yield
    Suspended,
    /// Completed, failed, or drained; terminal
    Done,
}

enum State<P: Producer> {
    NotStarted(P),
    Suspended {
        producer: P,
        /// `None` once the value has been handed out by value
        current: Option<P::Item>,
    },
    Done,
}

/// Lazily evaluated, single-pass sequence
///
/// Owns its producer exclusively; dropping the handle drops the producer even
/// mid-production, without running its completion path.
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::sequence;
///
/// let mut seq = sequence::range(0, 3);
/// assert!(seq.has_next().unwrap());
/// assert_eq!(seq.current(), Some(&0));
///
/// seq.advance().unwrap();
/// assert_eq!(seq.current(), Some(&1));
///
/// let rest: Vec<i32> = seq.values().collect();
/// assert_eq!(rest, [1, 2]);
/// ```
pub struct LazySequence<P: Producer> {
    state: State<P>,
}

impl<P: Producer> LazySequence<P> {
    /// Wrap a producer without running it
    #[inline]
    pub fn new(producer: P) -> Self {
        Self {
            state: State::NotStarted(producer),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SequenceState {
        match self.state {
            State::NotStarted(_) => SequenceState::NotStarted,
            State::Suspended { .. } => SequenceState::Suspended,
            State::Done => SequenceState::Done,
        }
    }

    /// Check if the sequence has completed
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Ensure a value is buffered if one remains, reporting whether it is
    ///
    /// Resumes the producer only when nothing is buffered: before the first
    /// production step, or after the buffered value was taken.
    pub fn has_next(&mut self) -> PullResult<bool, P::Error> {
        let buffered = match &self.state {
            State::Suspended { current, .. } => current.is_some(),
            State::NotStarted(_) => false,
            State::Done => return Ok(false),
        };

        if buffered {
            Ok(true)
        } else {
            self.advance()
        }
    }

    /// Resume the producer to the next yield, replacing any buffered value
    ///
    /// Returns `Ok(false)` once the sequence is exhausted; on `Done` this is
    /// a no-op. A failure ends the sequence and is returned once.
    pub fn advance(&mut self) -> PullResult<bool, P::Error> {
        let mut producer = match mem::replace(&mut self.state, State::Done) {
            State::NotStarted(producer) | State::Suspended { producer, .. } => producer,
            State::Done => return Ok(false),
        };

        match panic::catch_unwind(AssertUnwindSafe(|| producer.resume())) {
            Ok(Ok(Step::Yielded(value))) => {
                self.state = State::Suspended {
                    producer,
                    current: Some(value),
                };
                Ok(true)
            }
            Ok(Ok(Step::Complete)) => {
                trace!("Lazy sequence exhausted");
                Ok(false)
            }
            Ok(Err(e)) => {
                debug!("Lazy sequence ended by producer error");
                Err(SequenceError::Producer(e))
            }
            Err(payload) => {
                let message = panic_message(payload);
                debug!(panic = %message, "Lazy sequence ended by producer panic");
                Err(SequenceError::Panicked(message))
            }
        }
    }

    /// Most recently produced value, if still buffered
    ///
    /// `None` before the first production step and after exhaustion.
    #[inline]
    pub fn current(&self) -> Option<&P::Item> {
        match &self.state {
            State::Suspended { current, .. } => current.as_ref(),
            _ => None,
        }
    }

    /// Move the buffered value out
    #[inline]
    pub fn take_current(&mut self) -> Option<P::Item> {
        match &mut self.state {
            State::Suspended { current, .. } => current.take(),
            _ => None,
        }
    }

    /// Erase the producer type, keeping progress
    pub fn boxed<'a>(mut self) -> BoxedSequence<'a, P::Item, P::Error>
    where
        P: 'a,
    {
        let state: State<Box<dyn Producer<Item = P::Item, Error = P::Error> + 'a>> =
            match mem::replace(&mut self.state, State::Done) {
                State::NotStarted(producer) => State::NotStarted(Box::new(producer)),
                State::Suspended { producer, current } => State::Suspended {
                    producer: Box::new(producer),
                    current,
                },
                State::Done => State::Done,
            };
        LazySequence { state }
    }
}

impl<P> LazySequence<P>
where
    P: Producer<Error = Infallible>,
{
    /// Iterate plain values of an infallible producer
    ///
    /// A producer panic is re-raised on the pull that hit it.
    pub fn values(self) -> Values<P> {
        Values { inner: self }
    }
}

impl<P: Producer> Iterator for LazySequence<P> {
    type Item = PullResult<P::Item, P::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.take_current() {
            return Some(Ok(value));
        }

        match self.advance() {
            Ok(true) => self.take_current().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<P: Producer> FusedIterator for LazySequence<P> {}

impl<P: Producer> Drop for LazySequence<P> {
    fn drop(&mut self) {
        if !self.is_finished() {
            trace!(state = ?self.state(), "Lazy sequence abandoned before exhaustion");
        }
    }
}

impl<P: Producer> fmt::Debug for LazySequence<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("state", &self.state())
            .field(
                "buffered",
                &matches!(self.state, State::Suspended { current: Some(_), .. }),
            )
            .finish()
    }
}

/// Iterator over the values of an infallible sequence
///
/// Created by [`LazySequence::values`].
#[derive(Debug)]
pub struct Values<P: Producer<Error = Infallible>> {
    inner: LazySequence<P>,
}

impl<P> Values<P>
where
    P: Producer<Error = Infallible>,
{
    /// Recover the underlying sequence
    pub fn into_inner(self) -> LazySequence<P> {
        self.inner
    }
}

impl<P> Iterator for Values<P>
where
    P: Producer<Error = Infallible>,
{
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        match self.inner.next()? {
            Ok(value) => Some(value),
            Err(SequenceError::Producer(never)) => match never {},
            Err(SequenceError::Panicked(message)) => panic!("producer panicked: {}", message),
        }
    }
}

impl<P> FusedIterator for Values<P> where P: Producer<Error = Infallible> {}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{from_fn, range};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_creation_runs_nothing() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let seq = from_fn(move || {
            counter.set(counter.get() + 1);
            Ok::<_, Infallible>(Step::Yielded(()))
        });

        assert_eq!(seq.state(), SequenceState::NotStarted);
        assert_eq!(seq.current(), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_has_next_is_idempotent_while_buffered() {
        let mut seq = range(0u8, 2);
        assert!(seq.has_next().unwrap());
        assert!(seq.has_next().unwrap());
        assert_eq!(seq.current(), Some(&0));
    }

    #[test]
    fn test_advance_after_done_is_noop() {
        let mut seq = range(0, 1);
        assert!(seq.advance().unwrap());
        assert!(!seq.advance().unwrap());
        assert!(seq.is_finished());
        assert!(!seq.advance().unwrap());
        assert!(!seq.has_next().unwrap());
        assert_eq!(seq.current(), None);
    }

    #[test]
    fn test_next_hands_out_buffered_value() {
        let mut seq = range(10, 13);
        assert!(seq.has_next().unwrap());
        assert_eq!(seq.next(), Some(Ok(10)));
        assert_eq!(seq.current(), None);
        assert_eq!(seq.next(), Some(Ok(11)));
    }

    #[test]
    fn test_boxed_keeps_progress() {
        let mut seq = range(0, 4);
        seq.advance().unwrap();

        let boxed = seq.boxed();
        assert_eq!(boxed.state(), SequenceState::Suspended);
        let values: Vec<i32> = boxed.values().collect();
        assert_eq!(values, [0, 1, 2, 3]);
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "non-string panic payload");
    }
}
