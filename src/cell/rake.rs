//! The plain Rake: its workload is proportional to freshly-arrived wood, just
//! like RollingRake, but its sweep never reaches past its own `end_pos`
//! (spec.md §4.4) — grounded on `base_rake.py`'s `BaseRakeMixin`, the same
//! unraked-wood bookkeeping RollingRake uses, with the fixed-width clamp
//! RollingRake omits.

use crate::cell::{CellParameters, PickStrategy};
use crate::fastener::Fastener;
use crate::wood::SharedWood;

pub struct RakeCell {
    cycle_seconds: f64,
    last_rake_wood_pos: f64,
}

impl RakeCell {
    pub fn new(cycle_seconds: f64) -> Self {
        RakeCell {
            cycle_seconds,
            last_rake_wood_pos: 0.0,
        }
    }
}

impl PickStrategy for RakeCell {
    fn run_pick(&mut self, wood: &SharedWood, params: &CellParameters) -> (Vec<Fastener>, f64) {
        let total_translated = wood.borrow().total_translated();
        let unraked_wood = total_translated - self.last_rake_wood_pos;
        if unraked_wood == 0.0 {
            return (Vec::new(), 0.0);
        }
        self.last_rake_wood_pos = total_translated;

        let end = (params.start_pos + unraked_wood).min(params.end_pos());
        let (picks, _attempted) = wood
            .borrow_mut()
            .pick(
                params.pickable_surface,
                params.start_pos,
                end,
                &params.pick_probabilities,
                None,
            )
            .expect("Cell::step only calls run_pick while holding the work-lock");

        (picks, self.cycle_seconds)
    }

    fn type_name(&self) -> &'static str {
        "Rake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use crate::wood::Wood;
    use std::collections::HashMap;

    fn params() -> CellParameters {
        let mut probs = HashMap::new();
        probs.insert(Fastener::Screw, 1.0);
        CellParameters {
            start_pos: 0.0,
            working_width: 5.0,
            pickable_surface: Surface::Top,
            pick_probabilities: probs,
        }
    }

    #[test]
    fn costs_nothing_until_the_wood_has_moved() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 0.0)).collect();
        let wood = Wood::new(densities);
        let _guard = Wood::try_work_lock(&wood).unwrap();
        let mut strategy = RakeCell::new(4.0);
        let (picks, elapsed) = strategy.run_pick(&wood, &params());
        assert!(picks.is_empty());
        assert_eq!(elapsed, 0.0);
    }

    #[test]
    fn sweep_is_clamped_to_end_pos_even_when_unraked_wood_is_wider() {
        let densities: HashMap<Fastener, f64> = Fastener::ALL.iter().map(|&k| (k, 0.0)).collect();
        let wood = Wood::new(densities);
        {
            let _guard = Wood::try_work_lock(&wood).unwrap();
        }
        // Move further than the cell's working_width (5.0) of unraked wood.
        wood.borrow_mut().move_forward(8.0).unwrap();

        let _guard = Wood::try_work_lock(&wood).unwrap();
        let mut strategy = RakeCell::new(4.0);
        let (_picks, elapsed) = strategy.run_pick(&wood, &params());
        assert_eq!(elapsed, 4.0);
        assert_eq!(strategy.last_rake_wood_pos, 8.0);

        // A second call with no intervening move costs nothing.
        let (_picks, elapsed2) = strategy.run_pick(&wood, &params());
        assert_eq!(elapsed2, 0.0);
    }
}
