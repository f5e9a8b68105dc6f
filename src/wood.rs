//! The moving workpiece: fastener field, work/move mutual exclusion, board
//! generation (spec.md §4.3).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::WoodError;
use crate::fastener::{Fastener, FastenerRecord};
use crate::rng::SimRng;
use crate::surface::Surface;

/// How many meters of fasteners are kept generated ahead of the first
/// cell, in the interval `(-BUFFER_LEN, 0]`.
pub const BUFFER_LEN: f64 = 10.0;

pub type SharedWood = Rc<RefCell<Wood>>;

pub struct Wood {
    fasteners: Vec<FastenerRecord>,
    total_translated: f64,
    ongoing_work: u32,
    move_scheduled: bool,
    total_picked: u64,
    densities: HashMap<Fastener, f64>,
    rng: SimRng,
}

impl Wood {
    /// Builds a new Wood, pre-populating the buffer region with fasteners
    /// at the given densities, wrapped in the shared handle every Cell and
    /// the Conveyor hold a clone of.
    pub fn new(densities: HashMap<Fastener, f64>) -> SharedWood {
        let mut rng = SimRng::seeded();
        let fasteners = Self::generate_board(-BUFFER_LEN, 0.0, &densities, &mut rng);
        Rc::new(RefCell::new(Wood {
            fasteners,
            total_translated: 0.0,
            ongoing_work: 0,
            move_scheduled: false,
            total_picked: 0,
            densities,
            rng,
        }))
    }

    pub fn total_translated(&self) -> f64 {
        self.total_translated
    }

    pub fn total_picked(&self) -> u64 {
        self.total_picked
    }

    pub fn ongoing_work(&self) -> u32 {
        self.ongoing_work
    }

    pub fn move_scheduled(&self) -> bool {
        self.move_scheduled
    }

    pub fn fasteners(&self) -> &[FastenerRecord] {
        &self.fasteners
    }

    /// Acquires a work-lock, scoped to the returned guard's lifetime.
    /// Fails with [`WoodError::MoveScheduled`] once a move has been
    /// scheduled and is draining. This is a counting reservation, not
    /// mutual exclusion — many cells may hold it simultaneously; it only
    /// ever excludes `move`.
    pub fn try_work_lock(wood: &SharedWood) -> Result<WorkLockGuard, WoodError> {
        let mut w = wood.borrow_mut();
        if w.move_scheduled {
            return Err(WoodError::MoveScheduled);
        }
        w.ongoing_work += 1;
        drop(w);
        Ok(WorkLockGuard {
            wood: Rc::clone(wood),
        })
    }

    /// Sets the drain flag. Idempotent. No new work-locks succeed until
    /// `move_forward` completes.
    pub fn schedule_move(&mut self) {
        self.move_scheduled = true;
    }

    pub fn ready_for_move(&self) -> bool {
        self.ongoing_work == 0
    }

    /// Translates every retained fastener forward by `distance` and
    /// backfills the freshly vacated buffer region.
    pub fn move_forward(&mut self, distance: f64) -> Result<(), WoodError> {
        if distance <= 0.0 {
            return Err(WoodError::InvalidMoveDistance(distance));
        }
        if self.ongoing_work > 0 {
            return Err(WoodError::MovedWhileWorkActive {
                ongoing_work: self.ongoing_work,
            });
        }

        for fastener in self.fasteners.iter_mut() {
            fastener.position += distance;
        }

        let refill_end = -BUFFER_LEN + distance;
        if refill_end > -BUFFER_LEN {
            let mut fresh = Self::generate_board(-BUFFER_LEN, refill_end, &self.densities, &mut self.rng);
            self.fasteners.append(&mut fresh);
        }

        self.move_scheduled = false;
        self.total_translated += distance;
        Ok(())
    }

    /// Attempts to pick fasteners of the given surface within
    /// `(start_pos, end_pos]`, eligible under `pick_probabilities`.
    ///
    /// Requires the caller to be holding a work-lock.
    pub fn pick(
        &mut self,
        from_surface: Surface,
        start_pos: f64,
        end_pos: f64,
        pick_probabilities: &HashMap<Fastener, f64>,
        n_to_sample: Option<usize>,
    ) -> Result<(Vec<Fastener>, bool), WoodError> {
        if self.ongoing_work == 0 {
            return Err(WoodError::WorkLockNotHeld);
        }
        if !(start_pos >= 0.0 && start_pos < end_pos) {
            return Err(WoodError::InvalidPickRange { start_pos, end_pos });
        }

        let candidates: Vec<usize> = self
            .fasteners
            .iter()
            .enumerate()
            .filter(|(_, f)| {
                f.position > start_pos
                    && f.position <= end_pos
                    && f.surface == from_surface
                    && pick_probabilities.contains_key(&f.kind)
            })
            .map(|(idx, _)| idx)
            .collect();

        let attempted_indices: Vec<usize> = match n_to_sample {
            None => candidates,
            Some(n) if candidates.len() <= n => candidates,
            Some(n) => {
                let chosen = self.rng.sample_indices(candidates.len(), n);
                chosen.into_iter().map(|i| candidates[i]).collect()
            }
        };

        let attempted = !attempted_indices.is_empty();

        let mut picks = Vec::new();
        let mut to_remove = Vec::new();
        for idx in attempted_indices {
            let fastener = self.fasteners[idx];
            let probability = *pick_probabilities.get(&fastener.kind).unwrap_or(&0.0);
            let draw = self.rng.uniform01();
            if draw <= probability {
                picks.push(fastener.kind);
                to_remove.push(idx);
            }
        }

        // Remove highest index first so earlier indices stay valid.
        to_remove.sort_unstable_by(|a, b| b.cmp(a));
        for idx in to_remove {
            self.fasteners.swap_remove(idx);
        }

        self.total_picked += picks.len() as u64;
        Ok((picks, attempted))
    }

    /// A histogram of fasteners still sitting past `after_pos`.
    pub fn missed_fasteners(&self, after_pos: f64) -> HashMap<Fastener, u64> {
        let mut histogram = HashMap::new();
        for fastener in &self.fasteners {
            if fastener.position > after_pos {
                *histogram.entry(fastener.kind).or_insert(0) += 1;
            }
        }
        histogram
    }

    #[cfg(test)]
    pub(crate) fn push_fastener_for_test(&mut self, fastener: FastenerRecord) {
        self.fasteners.push(fastener);
    }

    fn generate_board(
        start_pos: f64,
        end_pos: f64,
        densities: &HashMap<Fastener, f64>,
        rng: &mut SimRng,
    ) -> Vec<FastenerRecord> {
        assert!(end_pos > start_pos, "board region must have positive length");
        let length = end_pos - start_pos;
        let mut board = Vec::new();

        // Iterate Fastener::ALL in fixed order (not HashMap iteration
        // order) so both the generated field and the RNG's subsequent
        // state are deterministic given a fixed seed.
        for kind in Fastener::ALL {
            let density = *densities.get(&kind).unwrap_or(&0.0);
            let expected = length * density;
            let whole = expected.floor();
            let mut count = whole as usize;
            let fraction = expected - whole;
            if fraction > 0.0 && rng.uniform01() < fraction {
                count += 1;
            }
            for _ in 0..count {
                let position = rng.uniform_range(start_pos, end_pos);
                let surface = rng.surface();
                board.push(FastenerRecord::new(position, surface, kind));
            }
        }

        board
    }
}

/// RAII guard for a held work-lock. Releases (decrements `ongoing_work`) on
/// every exit path, including an early return via `?`, since `Drop` cannot
/// fail — the idiomatic substitute for Python's
/// `@contextlib.contextmanager`.
pub struct WorkLockGuard {
    wood: SharedWood,
}

impl Drop for WorkLockGuard {
    fn drop(&mut self) {
        let mut w = self.wood.borrow_mut();
        w.ongoing_work -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_densities(value: f64) -> HashMap<Fastener, f64> {
        Fastener::ALL.iter().map(|&k| (k, value)).collect()
    }

    #[test]
    fn positions_stay_inside_buffer_region() {
        let wood = Wood::new(full_densities(2.0));
        let w = wood.borrow();
        assert!(w.fasteners().iter().all(|f| f.position > -BUFFER_LEN));
    }

    #[test]
    fn work_lock_blocks_move_and_releases_on_drop() {
        let wood = Wood::new(full_densities(1.0));
        let guard = Wood::try_work_lock(&wood).unwrap();
        assert_eq!(wood.borrow().ongoing_work(), 1);
        drop(guard);
        assert_eq!(wood.borrow().ongoing_work(), 0);
    }

    #[test]
    fn schedule_move_blocks_new_work_locks() {
        let wood = Wood::new(full_densities(1.0));
        wood.borrow_mut().schedule_move();
        let result = Wood::try_work_lock(&wood);
        assert!(matches!(result, Err(WoodError::MoveScheduled)));
        assert_eq!(wood.borrow().ongoing_work(), 0);
    }

    #[test]
    fn move_while_work_active_fails() {
        let wood = Wood::new(full_densities(1.0));
        let _guard = Wood::try_work_lock(&wood).unwrap();
        let result = wood.borrow_mut().move_forward(1.0);
        assert!(matches!(
            result,
            Err(WoodError::MovedWhileWorkActive { ongoing_work: 1 })
        ));
    }

    #[test]
    fn move_translates_every_fastener_by_exactly_distance() {
        let wood = Wood::new(full_densities(3.0));
        let before: Vec<f64> = wood.borrow().fasteners().iter().map(|f| f.position).collect();
        wood.borrow_mut().move_forward(2.5).unwrap();
        let after: Vec<f64> = wood
            .borrow()
            .fasteners()
            .iter()
            .take(before.len())
            .map(|f| f.position)
            .collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((a - b - 2.5).abs() < 1e-9);
        }
        assert!((wood.borrow().total_translated() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn no_position_at_or_below_negative_buffer_len_after_move() {
        let wood = Wood::new(full_densities(5.0));
        wood.borrow_mut().move_forward(4.0).unwrap();
        assert!(wood.borrow().fasteners().iter().all(|f| f.position > -BUFFER_LEN));
    }

    #[test]
    fn pick_without_lock_fails() {
        let wood = Wood::new(full_densities(1.0));
        let probs = full_densities(1.0);
        let result = wood
            .borrow_mut()
            .pick(Surface::Top, 0.0, 1.0, &probs, Some(1));
        assert!(matches!(result, Err(WoodError::WorkLockNotHeld)));
    }

    #[test]
    fn pick_all_with_certain_probabilities_removes_every_candidate() {
        let wood = Wood::new(full_densities(10.0));
        let _guard = Wood::try_work_lock(&wood).unwrap();
        let probs = full_densities(1.0);

        let candidate_count = wood
            .borrow()
            .fasteners()
            .iter()
            .filter(|f| f.position > 0.0 && f.position <= BUFFER_LEN && f.surface == Surface::Top)
            .count();

        let (picks, attempted) = wood
            .borrow_mut()
            .pick(Surface::Top, 0.0, BUFFER_LEN, &probs, None)
            .unwrap();

        assert_eq!(picks.len(), candidate_count);
        if candidate_count > 0 {
            assert!(attempted);
        }
    }

    #[test]
    fn empty_probabilities_pick_nothing() {
        let wood = Wood::new(full_densities(5.0));
        let _guard = Wood::try_work_lock(&wood).unwrap();
        let empty = HashMap::new();
        let (picks, attempted) = wood
            .borrow_mut()
            .pick(Surface::Top, 0.0, BUFFER_LEN, &empty, Some(1))
            .unwrap();
        assert!(picks.is_empty());
        assert!(!attempted);
    }

    #[test]
    fn zero_density_board_never_picks_but_move_still_advances() {
        let wood = Wood::new(full_densities(0.0));
        assert!(wood.borrow().fasteners().is_empty());

        let _guard = Wood::try_work_lock(&wood).unwrap();
        let probs = full_densities(1.0);
        let (picks, attempted) = wood
            .borrow_mut()
            .pick(Surface::Top, 0.0, BUFFER_LEN, &probs, None)
            .unwrap();
        assert!(picks.is_empty());
        assert!(!attempted);
        drop(_guard);

        wood.borrow_mut().move_forward(3.0).unwrap();
        assert!((wood.borrow().total_translated() - 3.0).abs() < 1e-9);
    }
}
