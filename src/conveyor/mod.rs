//! The Conveyor: decides how far to advance the board and runs the
//! writer-priority move-drain protocol (spec.md §4.5, §5).

pub mod policy;

pub use policy::{busyness_at, furthest_safe_move, ConveyorPolicy};

use crate::actor::Actor;
use crate::cell::CellDescriptor;
use crate::stats::{SharedTimer, TimerGuard};
use crate::wood::SharedWood;

enum Phase {
    /// Not yet committed to a move distance.
    Deciding,
    /// Committed to moving `0` by `f64`; waiting on the work-lock drain.
    Draining(f64),
}

pub struct Conveyor {
    wood: SharedWood,
    cells: Vec<CellDescriptor>,
    move_speed: f64,
    policy: ConveyorPolicy,
    timer: SharedTimer,
    phase: Phase,
    held_timer: Option<TimerGuard>,
}

impl Conveyor {
    pub fn new(wood: SharedWood, cells: Vec<CellDescriptor>, move_speed: f64, policy: ConveyorPolicy, timer: SharedTimer) -> Self {
        Conveyor {
            wood,
            cells,
            move_speed,
            policy,
            timer,
            phase: Phase::Deciding,
            held_timer: None,
        }
    }
}

impl Actor for Conveyor {
    fn step(&mut self) -> Option<f64> {
        // Resume from a prior move's sleep: the timer's scope ends here.
        self.held_timer = None;

        loop {
            match self.phase {
                Phase::Deciding => {
                    let distance = self.policy.decide(&self.wood, &self.cells);
                    if distance <= 0.0 {
                        return None;
                    }
                    self.wood.borrow_mut().schedule_move();
                    self.phase = Phase::Draining(distance);
                }
                Phase::Draining(distance) => {
                    if !self.wood.borrow().ready_for_move() {
                        return None;
                    }
                    self.wood
                        .borrow_mut()
                        .move_forward(distance)
                        .expect("the policy that picked this distance guarantees it's positive");
                    self.phase = Phase::Deciding;
                    self.held_timer = Some(TimerGuard::start(&self.timer));
                    return Some(distance / self.move_speed);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "Conveyor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::fastener::Fastener;
    use crate::stats::WorkTimer;
    use crate::wood::Wood;
    use std::collections::HashMap;

    #[test]
    fn dumb_policy_always_moves_by_the_configured_increment() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 0.0)).collect();
        let wood = Wood::new(densities);
        let timer = WorkTimer::new(Clock::new());
        let mut conveyor = Conveyor::new(
            wood.clone(),
            Vec::new(),
            2.0,
            ConveyorPolicy::Dumb { move_increment: 3.0 },
            timer,
        );

        let elapsed = conveyor.step();
        assert_eq!(elapsed, Some(1.5));
        assert!((wood.borrow().total_translated() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn greedy_distance_yields_none_when_there_is_nothing_to_gain() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 0.0)).collect();
        let wood = Wood::new(densities);
        let timer = WorkTimer::new(Clock::new());
        let mut conveyor = Conveyor::new(wood, Vec::new(), 1.0, ConveyorPolicy::GreedyDistance, timer);
        assert_eq!(conveyor.step(), None);
    }

    #[test]
    fn move_blocks_while_a_work_lock_is_held() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 0.0)).collect();
        let wood = Wood::new(densities);
        let guard = Wood::try_work_lock(&wood).unwrap();
        let timer = WorkTimer::new(Clock::new());
        let mut conveyor = Conveyor::new(
            wood.clone(),
            Vec::new(),
            1.0,
            ConveyorPolicy::Dumb { move_increment: 1.0 },
            timer,
        );

        assert_eq!(conveyor.step(), None);
        assert!(wood.borrow().move_scheduled());
        assert_eq!(wood.borrow().total_translated(), 0.0);

        drop(guard);
        let elapsed = conveyor.step();
        assert_eq!(elapsed, Some(1.0));
    }
}
