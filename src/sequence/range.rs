/*!
 * Arithmetic Ranges
 * Half-open integer ranges produced one value per resumption
 */

use super::producer::Producer;
use super::step::Step;
use std::convert::Infallible;

mod sealed {
    pub trait Sealed {}
}

/// Primitive integer usable as a range bound
pub trait Integral: Copy + PartialOrd + sealed::Sealed {
    /// Additive identity
    const ZERO: Self;
    /// Additive step of one
    const ONE: Self;

    /// Addition that reports overflow instead of wrapping
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_integral {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Integral for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline(always)]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_integral!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Producer for `[first, last)` advancing by a fixed positive step
///
/// Created by [`range`](crate::sequence::range) and
/// [`range_step`](crate::sequence::range_step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<T> {
    next: Option<T>,
    last: T,
    step: T,
}

impl<T: Integral> Range<T> {
    pub(crate) fn new(first: T, last: T, step: T) -> Self {
        Self {
            next: Some(first),
            last,
            step,
        }
    }
}

impl<T: Integral> Producer for Range<T> {
    type Item = T;
    type Error = Infallible;

    #[inline]
    fn resume(&mut self) -> Result<Step<T>, Infallible> {
        match self.next {
            Some(value) if value < self.last => {
                // Stepping past the type's maximum also ends the range
                self.next = value.checked_add(self.step);
                Ok(Step::Yielded(value))
            }
            _ => {
                self.next = None;
                Ok(Step::Complete)
            }
        }
    }
}
