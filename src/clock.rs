//! A shared, readable virtual-time handle.
//!
//! The Runtime owns the authoritative clock, but Cells, the Conveyor and
//! their Stats timers all need to read "what time is it" without a
//! back-reference into the Runtime that steps them. A cheap `Rc<Cell<f64>>`
//! clone gives every collaborator read access while keeping the Runtime as
//! the sole writer — the cooperative single-threaded model means there's
//! never a concurrent writer to guard against.

use std::cell::Cell as StdCell;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub struct Clock(Rc<StdCell<f64>>);

impl Clock {
    pub fn new() -> Self {
        Clock(Rc::new(StdCell::new(0.0)))
    }

    pub fn now(&self) -> f64 {
        self.0.get()
    }

    pub(crate) fn set(&self, t: f64) {
        self.0.set(t)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
