// src/core/availability.rs

//! Availability predicates and the cache that detects their transitions.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A predicate deciding whether a node currently takes part in dispatch and completion.
pub type AvailabilityRule = Rc<dyn Fn() -> bool>;

/// Builds a rule that always answers `value`.
pub fn constant(value: bool) -> AvailabilityRule {
    Rc::new(move || value)
}

/// Holds a node's availability predicate together with the last value it produced.
///
/// The cached value is never returned in place of a fresh evaluation. It only
/// exists so that a transition can be detected and announced.
pub(crate) struct Availability {
    rule: RefCell<AvailabilityRule>,
    last_observed: Cell<bool>,
}

impl Availability {
    pub(crate) fn new(rule: AvailabilityRule) -> Self {
        let initial = rule();
        Self {
            rule: RefCell::new(rule),
            last_observed: Cell::new(initial),
        }
    }

    /// Evaluates the predicate. Returns the fresh value and whether it differs
    /// from the previously observed one. The cache is updated in both cases.
    pub(crate) fn evaluate(&self) -> (bool, bool) {
        // Clone the handle out so the predicate may itself replace the rule.
        let rule = Rc::clone(&self.rule.borrow());
        let fresh = rule();
        let changed = fresh != self.last_observed.replace(fresh);
        (fresh, changed)
    }

    /// Replaces the predicate without evaluating it.
    pub(crate) fn set_rule(&self, rule: AvailabilityRule) {
        *self.rule.borrow_mut() = rule;
    }

    #[cfg(test)]
    pub(crate) fn last_observed(&self) -> bool {
        self.last_observed.get()
    }
}

impl fmt::Debug for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Availability")
            .field("last_observed", &self.last_observed.get())
            .finish_non_exhaustive()
    }
}
