//! Mutable state slots shared between async flows and the UI.
//!
//! Flows are written against [`StateCell`] so the same code drives a
//! reactive `RwSignal` in the browser and a plain `RefCell` in unit tests.

use leptos::prelude::*;
use std::cell::RefCell;

pub trait StateCell<T> {
    /// Runs `f` against the current value. Does nothing once the slot is gone.
    fn update_with(&self, f: &mut dyn FnMut(&mut T));
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn update_with(&self, f: &mut dyn FnMut(&mut T)) {
        // Disposed after unmount; late async continuations land here
        let _ = self.try_update(|value| f(value));
    }
}

impl<T> StateCell<T> for RefCell<T> {
    fn update_with(&self, f: &mut dyn FnMut(&mut T)) {
        f(&mut self.borrow_mut());
    }
}

/// Applies `f` to the cell and returns its result, or `R::default()` if the
/// cell no longer holds a value.
pub fn apply<T, R: Default>(cell: &dyn StateCell<T>, f: impl FnOnce(&mut T) -> R) -> R {
    let mut f = Some(f);
    let mut out = R::default();
    cell.update_with(&mut |value| {
        if let Some(f) = f.take() {
            out = f(value);
        }
    });
    out
}
