//! The three move-planning policies and the geometry math they share
//! (spec.md §4.5), grounded on `furthest_move.py` / `busyness.py` /
//! `dumb_wood_conveyor.py`.

use crate::cell::CellDescriptor;
use crate::fastener::Fastener;
use crate::wood::SharedWood;

#[derive(Clone, Debug)]
pub enum ConveyorPolicy {
    /// Always moves by a fixed increment.
    Dumb { move_increment: f64 },
    /// Moves the furthest distance that doesn't push any fastener kind past
    /// the last cell able to pick it.
    GreedyDistance,
    /// Searches increments up to the greedy-distance bound for the one that
    /// maximizes predicted cell busyness.
    GreedyBusyness { optimization_increment: f64 },
}

impl ConveyorPolicy {
    pub fn decide(&self, wood: &SharedWood, cells: &[CellDescriptor]) -> f64 {
        match self {
            ConveyorPolicy::Dumb { move_increment } => *move_increment,
            ConveyorPolicy::GreedyDistance => furthest_safe_move(wood, cells),
            ConveyorPolicy::GreedyBusyness { optimization_increment } => {
                optimal_busyness_move(wood, cells, *optimization_increment)
            }
        }
    }
}

/// The furthest distance the board can move without pushing any present
/// fastener kind past the last cell capable of picking it.
pub fn furthest_safe_move(wood: &SharedWood, cells: &[CellDescriptor]) -> f64 {
    let w = wood.borrow();
    let mut per_kind_maxima = Vec::new();

    for kind in Fastener::ALL {
        let highest_fastener = w
            .fasteners()
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.position)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))));

        let Some(highest_fastener) = highest_fastener else {
            // No records of this kind on the board at all: it imposes no
            // constraint on the move.
            continue;
        };

        let mut best_delta = f64::NEG_INFINITY;
        let mut best_end_pos = f64::NEG_INFINITY;
        for cell in cells {
            let probability = cell.pick_probabilities.get(&kind).copied().unwrap_or(0.0);
            if probability <= 0.0 {
                continue;
            }
            let delta = cell.end_pos - highest_fastener;
            // Strictly greater delta always wins; an equal delta is
            // tie-broken by the larger end_pos.
            if delta > best_delta || (delta == best_delta && cell.end_pos > best_end_pos) {
                best_delta = delta;
                best_end_pos = cell.end_pos;
            }
        }

        if best_delta >= 0.0 {
            per_kind_maxima.push(best_delta);
        }
    }

    if per_kind_maxima.is_empty() {
        0.0
    } else {
        per_kind_maxima.into_iter().fold(f64::INFINITY, f64::min)
    }
}

/// Counts, at a hypothetical `move_distance`, how many of `cells` would
/// have at least one pickable fastener in range on their surface.
pub fn busyness_at(wood: &SharedWood, cells: &[CellDescriptor], move_distance: f64) -> usize {
    let w = wood.borrow();
    cells
        .iter()
        .filter(|cell| {
            w.fasteners().iter().any(|f| {
                let shifted = f.position + move_distance;
                cell.pick_probabilities.get(&f.kind).copied().unwrap_or(0.0) > 0.0
                    && f.surface == cell.surface
                    && shifted > cell.start_pos
                    && shifted < cell.end_pos
            })
        })
        .count()
}

fn optimal_busyness_move(wood: &SharedWood, cells: &[CellDescriptor], optimization_increment: f64) -> f64 {
    let furthest_move = furthest_safe_move(wood, cells);

    // Rakes are excluded: their busyness depends on how much unraked wood
    // has accumulated, not on the hypothetical future board position.
    let cells_without_rakes: Vec<CellDescriptor> = cells.iter().filter(|c| !c.is_rake).cloned().collect();

    let mut best_increment = 0.0_f64;
    let mut best_busyness = 0usize;
    let mut increment = 0.0_f64;
    while increment < furthest_move {
        let busyness = busyness_at(wood, &cells_without_rakes, increment);
        if busyness > best_busyness {
            best_busyness = busyness;
            best_increment = increment;
        }
        increment += optimization_increment;
    }

    best_increment
}
