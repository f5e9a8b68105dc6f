//! Per-cell utilization and pick accounting (spec.md §4.6).

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::clock::Clock;
use crate::error::ConfigError;
use crate::stats::work_timer::{SharedTimer, WorkTimer};
use crate::surface::Surface;

pub struct RobotStats {
    pub cell_type_name: &'static str,
    pub start_pos: f64,
    pub end_pos: f64,
    pub surface: Surface,
    pub work_timer: SharedTimer,
    pub waiting_for_wood_timer: SharedTimer,
    picks: u64,
}

impl RobotStats {
    pub fn new(
        cell_type_name: &'static str,
        start_pos: f64,
        end_pos: f64,
        surface: Surface,
        clock: Clock,
    ) -> Self {
        RobotStats {
            cell_type_name,
            start_pos,
            end_pos,
            surface,
            work_timer: WorkTimer::new(clock.clone()),
            waiting_for_wood_timer: WorkTimer::new(clock),
            picks: 0,
        }
    }

    pub fn record_picks(&mut self, count: usize) {
        self.picks += count as u64;
    }

    pub fn picks(&self) -> u64 {
        self.picks
    }

    /// The uniqueness key the spec assigns to a `RobotStats`: `f64` has no
    /// `Hash`/`Eq`, so the bit pattern stands in for it — the same
    /// "wrap the float to get the trait I need" move the teacher makes with
    /// `TimeStamp`/`Duration`.
    fn key(&self) -> (u64, u64, Surface) {
        (self.start_pos.to_bits(), self.end_pos.to_bits(), self.surface)
    }
}

/// Owns every registered [`RobotStats`] and rejects duplicate
/// `(start_pos, end_pos, surface)` registrations.
#[derive(Default)]
pub struct StatsTracker {
    robots: Vec<Rc<RefCell<RobotStats>>>,
    seen_keys: HashSet<(u64, u64, Surface)>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, stats: RobotStats) -> Result<Rc<RefCell<RobotStats>>, ConfigError> {
        let key = stats.key();
        if !self.seen_keys.insert(key) {
            return Err(ConfigError::DuplicateCell {
                start_pos: stats.start_pos,
                end_pos: stats.end_pos,
                surface: stats.surface.name(),
            });
        }
        let handle = Rc::new(RefCell::new(stats));
        self.robots.push(Rc::clone(&handle));
        Ok(handle)
    }

    pub fn robots(&self) -> &[Rc<RefCell<RobotStats>>] {
        &self.robots
    }
}
