//! Cells: actors that drive the pick loop against a single surface of the
//! Wood (spec.md §4.4).

pub mod rake;
pub mod rolling_rake;
pub mod single_pick;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::actor::Actor;
use crate::error::WoodError;
use crate::fastener::Fastener;
use crate::stats::{RobotStats, TimerGuard};
use crate::surface::Surface;
use crate::wood::{SharedWood, Wood, WorkLockGuard};

/// Configuration shared by every cell variant.
#[derive(Clone, Debug)]
pub struct CellParameters {
    pub start_pos: f64,
    pub working_width: f64,
    pub pickable_surface: Surface,
    pub pick_probabilities: HashMap<Fastener, f64>,
}

impl CellParameters {
    pub fn end_pos(&self) -> f64 {
        self.start_pos + self.working_width
    }
}

/// The part of a Cell that's specific to its concrete kind: how it performs
/// one atomic pick unit. Returning `seconds == 0.0` signals "nothing to
/// pick here right now".
pub trait PickStrategy {
    fn run_pick(&mut self, wood: &SharedWood, params: &CellParameters) -> (Vec<Fastener>, f64);
    fn type_name(&self) -> &'static str;
}

/// A read-only snapshot of a cell's static placement and pick eligibility,
/// as the Conveyor's move-planning policies need it (spec.md §4.5). Cloned
/// out of a live [`Cell`] at wiring time — the Conveyor never touches a
/// Cell's mutable state, only this descriptor.
#[derive(Clone, Debug)]
pub struct CellDescriptor {
    pub type_name: &'static str,
    pub start_pos: f64,
    pub end_pos: f64,
    pub surface: Surface,
    pub pick_probabilities: HashMap<Fastener, f64>,
    /// True only for the plain `Rake`, not `RollingRake` — matches the
    /// original's `isinstance(c, Rake)` exclusion in the busyness forecast,
    /// which does not match rolling rakes as they're a sibling type.
    pub is_rake: bool,
}

/// The actor every concrete cell is built from: the acquire/pick/yield loop
/// is identical across variants (spec.md §4.4); only [`PickStrategy`]
/// differs.
pub struct Cell<S: PickStrategy> {
    wood: SharedWood,
    params: CellParameters,
    strategy: S,
    stats: Rc<RefCell<RobotStats>>,
    label: String,

    /// Held across a sleep while a successful pick's elapsed time passes —
    /// released (dropped) at the top of the next `step` call.
    held_lock: Option<WorkLockGuard>,
    held_work_timer: Option<TimerGuard>,
    /// Held across a `None` yield while draining for a scheduled move.
    held_waiting_timer: Option<TimerGuard>,
}

impl<S: PickStrategy> Cell<S> {
    pub fn new(wood: SharedWood, params: CellParameters, strategy: S, stats: Rc<RefCell<RobotStats>>) -> Self {
        let label = format!("{}@{}", strategy.type_name(), params.pickable_surface);
        Cell {
            wood,
            params,
            strategy,
            stats,
            label,
            held_lock: None,
            held_work_timer: None,
            held_waiting_timer: None,
        }
    }

    pub fn descriptor(&self) -> CellDescriptor {
        CellDescriptor {
            type_name: self.strategy.type_name(),
            start_pos: self.params.start_pos,
            end_pos: self.params.end_pos(),
            surface: self.params.pickable_surface,
            pick_probabilities: self.params.pick_probabilities.clone(),
            is_rake: self.strategy.type_name() == "Rake",
        }
    }
}

impl<S: PickStrategy> Actor for Cell<S> {
    fn step(&mut self) -> Option<f64> {
        // Resume from whatever we were suspended on: exiting a `with`
        // block is releasing the lock/timer it guarded.
        self.held_work_timer = None;
        self.held_lock = None;
        self.held_waiting_timer = None;

        match Wood::try_work_lock(&self.wood) {
            Ok(guard) => {
                let (picks, elapsed) = self.strategy.run_pick(&self.wood, &self.params);
                self.stats.borrow_mut().record_picks(picks.len());

                if elapsed > 0.0 {
                    let timer = self.stats.borrow().work_timer.clone();
                    self.held_work_timer = Some(TimerGuard::start(&timer));
                    self.held_lock = Some(guard);
                    Some(elapsed)
                } else {
                    drop(guard);
                    None
                }
            }
            Err(WoodError::MoveScheduled) => {
                let timer = self.stats.borrow().waiting_for_wood_timer.clone();
                self.held_waiting_timer = Some(TimerGuard::start(&timer));
                None
            }
            Err(other) => unreachable!("Cell::step hit an unexpected Wood error: {other}"),
        }
    }

    fn name(&self) -> &str {
        &self.label
    }
}
