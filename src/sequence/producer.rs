/*!
 * Producers
 *
 * A producer is an explicit resumable state machine: its captured locals are
 * struct fields and its resume point is part of that state. Each call to
 * `resume` runs from the last suspension point to the next yield.
 */

use super::step::Step;
use std::convert::Infallible;
use std::fmt;

/// Resumable computation yielding one value per resumption
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::sequence::{LazySequence, Producer, Step};
/// use std::convert::Infallible;
///
/// /// Counts down from `n`, then yields "liftoff"
/// enum Countdown {
///     Counting(u32),
///     Done,
/// }
///
/// impl Producer for Countdown {
///     type Item = String;
///     type Error = Infallible;
///
///     fn resume(&mut self) -> Result<Step<String>, Infallible> {
///         Ok(match *self {
///             Countdown::Counting(0) => {
///                 *self = Countdown::Done;
///                 Step::Yielded("liftoff".into())
///             }
///             Countdown::Counting(n) => {
///                 *self = Countdown::Counting(n - 1);
///                 Step::Yielded(n.to_string())
///             }
///             Countdown::Done => Step::Complete,
///         })
///     }
/// }
///
/// let words: Vec<_> = LazySequence::new(Countdown::Counting(2)).values().collect();
/// assert_eq!(words, ["2", "1", "liftoff"]);
/// ```
pub trait Producer {
    /// Value yielded at each suspension
    type Item;
    /// Failure that ends the sequence
    type Error;

    /// Run until the next yield or completion
    ///
    /// Never called again after returning `Complete` or an error.
    fn resume(&mut self) -> Result<Step<Self::Item>, Self::Error>;
}

impl<P> Producer for Box<P>
where
    P: Producer + ?Sized,
{
    type Item = P::Item;
    type Error = P::Error;

    #[inline]
    fn resume(&mut self) -> Result<Step<Self::Item>, Self::Error> {
        (**self).resume()
    }
}

/// Producer driven by a closure
///
/// Created by [`from_fn`](crate::sequence::from_fn).
pub struct FromFn<F> {
    f: F,
}

impl<F> FromFn<F> {
    pub(crate) fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, E, F> Producer for FromFn<F>
where
    F: FnMut() -> Result<Step<T>, E>,
{
    type Item = T;
    type Error = E;

    #[inline]
    fn resume(&mut self) -> Result<Step<T>, E> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Producer pulling lazily from an iterator
///
/// Created by [`from_iter`](crate::sequence::from_iter).
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    iter: I,
}

impl<I> FromIter<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> Producer for FromIter<I>
where
    I: Iterator,
{
    type Item = I::Item;
    type Error = Infallible;

    #[inline]
    fn resume(&mut self) -> Result<Step<I::Item>, Infallible> {
        Ok(self.iter.next().into())
    }
}
