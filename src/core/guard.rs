//! Guard predicates for controlling phase transitions.
//!
//! Guards are pure boolean functions over an evaluation context. Each
//! transition rule owns one; the rule fires only when its guard passes.

use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can fire.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::core::{ControllerState, Guard, Phase};
///
/// let in_yellow = Guard::new(|s: &ControllerState| s.phase.is_yellow());
///
/// assert!(in_yellow.check(&ControllerState::new(Phase::HYellow, 1)));
/// assert!(!in_yellow.check(&ControllerState::initial()));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&C)>,
}

impl<C: 'static> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Evaluate the guard against a context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    /// Guard that passes only when both guards pass.
    ///
    /// ```rust
    /// use adaptive_tls::core::Guard;
    ///
    /// let positive = Guard::new(|n: &i32| *n > 0);
    /// let small = Guard::new(|n: &i32| *n < 10);
    /// let both = positive.and(small);
    ///
    /// assert!(both.check(&5));
    /// assert!(!both.check(&12));
    /// assert!(!both.check(&-1));
    /// ```
    pub fn and(self, other: Guard<C>) -> Self {
        Guard::new(move |c: &C| self.check(c) && other.check(c))
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
