/*!
 * Resumption Step
 * Outcome of resuming a producer once
 */

/// Result of a single resumption: either a yielded value or completion
///
/// # Examples
///
/// ```
/// use lazy_rendezvous::sequence::Step;
///
/// let step = Step::Yielded(21).map(|x| x * 2);
/// assert_eq!(step.into_yielded(), Some(42));
/// assert!(Step::<i32>::Complete.is_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<T> {
    /// The producer suspended after yielding a value
    Yielded(T),
    /// The producer finished without yielding
    Complete,
}

impl<T> Step<T> {
    /// Returns `true` if the step is `Yielded`
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the step is `Complete`
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete)
    }

    /// Converts into `Option<T>`, discarding completion
    #[inline]
    pub fn into_yielded(self) -> Option<T> {
        match self {
            Step::Yielded(value) => Some(value),
            Step::Complete => None,
        }
    }

    /// Maps a yielded value, leaving completion untouched
    #[inline]
    pub fn map<U, F>(self, f: F) -> Step<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Step::Yielded(value) => Step::Yielded(f(value)),
            Step::Complete => Step::Complete,
        }
    }
}

impl<T> From<Option<T>> for Step<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Step::Yielded(value),
            None => Step::Complete,
        }
    }
}
