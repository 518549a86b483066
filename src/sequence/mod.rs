/*!
 * Lazy Sequences
 *
 * Generators built from explicit resumable state machines:
 * - `Producer`: the suspended computation, resumed once per value
 * - `LazySequence`: the owning handle driving it on demand
 *
 * Work is deferred until a value is pulled, and no more than one unconsumed
 * value is ever materialized.
 */

mod lazy;
mod producer;
mod range;
mod step;

pub use lazy::{BoxedSequence, LazySequence, PullResult, SequenceState, Values};
pub use producer::{FromFn, FromIter, Producer};
pub use range::{Integral, Range};
pub use step::Step;

/// Sequence driven by a closure called once per pull
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::sequence::{self, Step};
///
/// let mut a = 0u64;
/// let mut b = 1u64;
/// let fib = sequence::from_fn(move || {
///     let next = a;
///     (a, b) = (b, a + b);
///     Ok::<_, std::convert::Infallible>(Step::Yielded(next))
/// });
///
/// let first: Vec<u64> = fib.values().take(6).collect();
/// assert_eq!(first, [0, 1, 1, 2, 3, 5]);
/// ```
pub fn from_fn<T, E, F>(f: F) -> LazySequence<FromFn<F>>
where
    F: FnMut() -> Result<Step<T>, E>,
{
    LazySequence::new(FromFn::new(f))
}

/// Sequence pulling lazily from any iterator
pub fn from_iter<I>(iter: I) -> LazySequence<FromIter<I::IntoIter>>
where
    I: IntoIterator,
{
    LazySequence::new(FromIter::new(iter.into_iter()))
}

/// Half-open range `[first, last)`
#[inline]
pub fn range<T: Integral>(first: T, last: T) -> LazySequence<Range<T>> {
    LazySequence::new(Range::new(first, last, T::ONE))
}

/// Half-open range `[first, last)` advancing by `step`
///
/// # Panics
///
/// Panics if `step` is not positive.
pub fn range_step<T: Integral>(first: T, last: T, step: T) -> LazySequence<Range<T>> {
    assert!(step > T::ZERO, "range step must be positive");
    LazySequence::new(Range::new(first, last, step))
}
