//! A working/slacking state timer, scoped by an RAII guard (spec.md §4.6).
//!
//! `enter`/`exit` are the state transitions; `TimerGuard` brackets a
//! yield-bearing section the way Python's `@contextlib.contextmanager`
//! brackets a generator's `yield` — except here the bracketed section can
//! span several `Actor::step` calls, so the guard itself (not a lexical
//! scope) is what has to survive across them, stored as a field on the
//! actor's phase state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::Clock;

pub type SharedTimer = Rc<RefCell<WorkTimer>>;

pub struct WorkTimer {
    clock: Clock,
    working: f64,
    slacking: f64,
    last_end: f64,
    active_since: Option<f64>,
}

impl WorkTimer {
    pub fn new(clock: Clock) -> SharedTimer {
        let start = clock.now();
        Rc::new(RefCell::new(WorkTimer {
            clock,
            working: 0.0,
            slacking: 0.0,
            last_end: start,
            active_since: None,
        }))
    }

    pub fn working(&self) -> f64 {
        self.working
    }

    pub fn slacking(&self) -> f64 {
        self.slacking
    }

    pub fn utilization_ratio(&self) -> f64 {
        let total = self.working + self.slacking;
        if total == 0.0 {
            0.0
        } else {
            self.working / total
        }
    }

    fn enter(&mut self) {
        let now = self.clock.now();
        let slack = now - self.last_end;
        assert!(slack >= 0.0, "slack time accrued since last_end must be non-negative");
        self.slacking += slack;
        assert!(self.active_since.is_none(), "timer entered while already active");
        self.active_since = Some(now);
    }

    fn exit(&mut self) {
        let now = self.clock.now();
        let start = self
            .active_since
            .take()
            .expect("timer exited without a matching enter");
        // A waiting-for-wood span can legitimately close at the same virtual
        // timestamp it opened (the Conveyor and the lock-holder it's
        // draining can land on the same scheduling pass), so a zero-length
        // span is a no-op rather than a bug — only going backwards is.
        assert!(now >= start, "a timed span must not end before it started");
        if now > start {
            self.working += now - start;
        }
        self.last_end = now;
    }
}

/// Brackets a working span on a [`WorkTimer`]. Construct with
/// [`TimerGuard::start`] and hold it (as a struct field, if it needs to
/// outlive a single `step` call) until the span ends; dropping it records
/// the span.
pub struct TimerGuard {
    timer: SharedTimer,
}

impl TimerGuard {
    pub fn start(timer: &SharedTimer) -> Self {
        timer.borrow_mut().enter();
        TimerGuard {
            timer: Rc::clone(timer),
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.timer.borrow_mut().exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_ratio_is_zero_with_no_history() {
        let timer = WorkTimer::new(Clock::new());
        assert_eq!(timer.borrow().utilization_ratio(), 0.0);
    }

    #[test]
    fn working_and_slacking_accumulate_across_spans() {
        let clock = Clock::new();
        let timer = WorkTimer::new(clock.clone());

        clock.set(1.0);
        let guard = TimerGuard::start(&timer);
        clock.set(3.0);
        drop(guard);
        // 1.0 slacking (from 0.0 to 1.0), 2.0 working (from 1.0 to 3.0)
        assert!((timer.borrow().slacking() - 1.0).abs() < 1e-12);
        assert!((timer.borrow().working() - 2.0).abs() < 1e-12);
        assert!((timer.borrow().utilization_ratio() - (2.0 / 3.0)).abs() < 1e-12);
    }
}
