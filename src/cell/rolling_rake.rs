//! RollingRake: only sweeps the swath of wood that has actually moved past
//! it since its last cycle, so it doesn't get an unrealistic advantage from
//! small, frequent conveyor moves (spec.md §4.4). Grounded directly on
//! `BaseRakeMixin`'s unraked-wood bookkeeping: the far edge of the sweep is
//! `start_pos + unraked_wood`, not clamped to the cell's configured
//! `working_width`.

use crate::cell::{CellParameters, PickStrategy};
use crate::fastener::Fastener;
use crate::wood::SharedWood;

pub struct RollingRakeCell {
    cycle_seconds: f64,
    last_rake_wood_pos: f64,
}

impl RollingRakeCell {
    pub fn new(cycle_seconds: f64) -> Self {
        RollingRakeCell {
            cycle_seconds,
            last_rake_wood_pos: 0.0,
        }
    }
}

impl PickStrategy for RollingRakeCell {
    fn run_pick(&mut self, wood: &SharedWood, params: &CellParameters) -> (Vec<Fastener>, f64) {
        let total_translated = wood.borrow().total_translated();
        let unraked_wood = total_translated - self.last_rake_wood_pos;
        if unraked_wood == 0.0 {
            return (Vec::new(), 0.0);
        }
        self.last_rake_wood_pos = total_translated;

        let (picks, _attempted) = wood
            .borrow_mut()
            .pick(
                params.pickable_surface,
                params.start_pos,
                params.start_pos + unraked_wood,
                &params.pick_probabilities,
                None,
            )
            .expect("Cell::step only calls run_pick while holding the work-lock");

        (picks, self.cycle_seconds)
    }

    fn type_name(&self) -> &'static str {
        "RollingRake"
    }
}
