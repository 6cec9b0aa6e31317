//! Reentrancy Guard
//!
//! Scoped mutual exclusion around the engine's mutating entry points.
//! An external collaborator that calls back into a guarded operation
//! before the first one finished observes `ReentrantCall` instead of a
//! half-applied state transition.
//!
//! The lock is released on every exit path: [`ReentrancyGuard::enter`]
//! hands out an RAII [`GuardScope`] whose `Drop` clears the flag, so
//! early returns and error paths need no bookkeeping. The engine runs
//! single-threaded per the execution model, hence the plain `Cell`.

use std::cell::Cell;
use std::rc::Rc;

use synthex_common::errors::{SynthError, SynthResult};

/// Mutual-exclusion flag shared by all entry points of one engine
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Rc<Cell<bool>>,
}

/// Active guard scope; dropping it releases the lock
#[derive(Debug)]
pub struct GuardScope {
    entered: Rc<Cell<bool>>,
}

impl ReentrancyGuard {
    /// Create a released guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for the duration of the returned scope.
    ///
    /// Fails with `ReentrantCall` when a scope from this guard is still
    /// alive in the current call stack.
    pub fn enter(&self) -> SynthResult<GuardScope> {
        if self.entered.get() {
            return Err(SynthError::ReentrantCall);
        }
        self.entered.set(true);
        Ok(GuardScope {
            entered: Rc::clone(&self.entered),
        })
    }

    /// True while a scope is alive
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        self.entered.set(false);
    }
}
