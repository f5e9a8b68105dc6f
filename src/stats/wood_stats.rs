//! The Conveyor's own timer, extended with throughput queries derived from
//! the Wood (spec.md §4.6). Composition stands in for the Python original's
//! subclassing of `WorkTimer` — Rust has no inheritance, and the timer
//! behavior here is identical to any other `WorkTimer`, so wrapping one is
//! simpler than re-deriving its transitions.

use crate::clock::Clock;
use crate::stats::work_timer::{SharedTimer, WorkTimer};
use crate::wood::SharedWood;

/// Meters to feet, used for the board-feet/throughput report fields.
pub const METERS_TO_FEET: f64 = 3.280839895;

pub struct WoodStats {
    pub timer: SharedTimer,
    wood: SharedWood,
    clock: Clock,
}

impl WoodStats {
    pub fn new(wood: SharedWood, clock: Clock) -> Self {
        WoodStats {
            timer: WorkTimer::new(clock.clone()),
            wood,
            clock,
        }
    }

    pub fn throughput_meters(&self) -> f64 {
        let t = self.clock.now();
        if t == 0.0 {
            0.0
        } else {
            self.wood.borrow().total_translated() / t
        }
    }

    pub fn throughput_feet(&self) -> f64 {
        self.throughput_meters() * METERS_TO_FEET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastener::Fastener;
    use crate::wood::Wood;
    use std::collections::HashMap;

    #[test]
    fn throughput_is_zero_at_time_zero() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 1.0)).collect();
        let wood = Wood::new(densities);
        let clock = Clock::new();
        let stats = WoodStats::new(wood, clock);
        assert_eq!(stats.throughput_meters(), 0.0);
    }

    #[test]
    fn throughput_matches_translated_over_time() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 1.0)).collect();
        let wood = Wood::new(densities);
        wood.borrow_mut().move_forward(10.0).unwrap();
        let clock = Clock::new();
        clock.set(5.0);
        let stats = WoodStats::new(wood, clock);
        assert!((stats.throughput_meters() - 2.0).abs() < 1e-9);
    }
}
