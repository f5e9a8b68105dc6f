//! BigBird and ScrewManipulator: both pick a single fastener per cycle from
//! their full working range, and only spend time if a fastener was actually
//! attempted (spec.md §4.4). They differ only in label and configured
//! pick duration, so one strategy type serves both.

use crate::cell::{CellParameters, PickStrategy};
use crate::fastener::Fastener;
use crate::wood::SharedWood;

pub struct SinglePickCell {
    pick_seconds: f64,
    kind_name: &'static str,
}

impl SinglePickCell {
    pub fn big_bird(pick_seconds: f64) -> Self {
        SinglePickCell {
            pick_seconds,
            kind_name: "BigBird",
        }
    }

    pub fn screw_manipulator(pick_seconds: f64) -> Self {
        SinglePickCell {
            pick_seconds,
            kind_name: "ScrewManipulator",
        }
    }
}

impl PickStrategy for SinglePickCell {
    fn run_pick(&mut self, wood: &SharedWood, params: &CellParameters) -> (Vec<Fastener>, f64) {
        let (picks, attempted) = wood
            .borrow_mut()
            .pick(
                params.pickable_surface,
                params.start_pos,
                params.end_pos(),
                &params.pick_probabilities,
                Some(1),
            )
            .expect("Cell::step only calls run_pick while holding the work-lock");

        let elapsed = if attempted { self.pick_seconds } else { 0.0 };
        (picks, elapsed)
    }

    fn type_name(&self) -> &'static str {
        self.kind_name
    }
}
