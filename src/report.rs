//! Turns [`crate::stats`] and [`crate::wood::Wood`] accessors into the
//! report structures external reporting collaborators read (spec.md §6).
//! This module is part of the core ("the core must expose accessors");
//! rendering those structures as HTML stays a thin adapter in the CLI
//! binary, per §1's Non-goal.

use std::collections::HashMap;

use crate::stats::wood_stats::METERS_TO_FEET;
use crate::stats::{StatsTracker, WoodStats};
use crate::surface::Surface;
use crate::wood::Wood;

/// Board feet of (nominal) 2x12 lumber per linear foot of board, from the
/// dressed cross-section of 1.5in x 11.25in: `1.5 * 11.25 / 12`.
pub const BOARD_FEET_PER_LINEAR_FOOT_2X12: f64 = 1.40625;

pub const SECONDS_PER_8_HOUR_SHIFT: f64 = 8.0 * 60.0 * 60.0;

/// One row of the per-robot report: `cell_id` is the index of the cell's
/// `end_pos` in the sorted unique list of all cells' `end_pos` (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
pub struct RobotReport {
    pub cell_id: usize,
    pub surface: Surface,
    pub type_name: &'static str,
    pub work_time_ratio: f64,
    pub wait_time_ratio: f64,
    pub n_picked_fasteners: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallReport {
    pub total_time: f64,
    pub total_fasteners: u64,
    pub processed_feet: f64,
    pub throughput_feet_per_8h: f64,
    pub board_feet_per_8h_2x12: f64,
}

/// Builds one [`RobotReport`] per registered robot, in no particular order
/// beyond `StatsTracker`'s own registration order.
pub fn robot_reports(stats: &StatsTracker) -> Vec<RobotReport> {
    let mut end_positions: Vec<f64> = stats.robots().iter().map(|r| r.borrow().end_pos).collect();
    end_positions.sort_by(|a, b| a.partial_cmp(b).expect("end_pos is never NaN"));
    end_positions.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);

    stats
        .robots()
        .iter()
        .map(|handle| {
            let robot = handle.borrow();
            let cell_id = end_positions
                .iter()
                .position(|&e| (e - robot.end_pos).abs() < f64::EPSILON)
                .expect("a robot's own end_pos is always present in the list derived from it");
            RobotReport {
                cell_id,
                surface: robot.surface,
                type_name: robot.cell_type_name,
                work_time_ratio: robot.work_timer.borrow().utilization_ratio(),
                wait_time_ratio: robot.waiting_for_wood_timer.borrow().utilization_ratio(),
                n_picked_fasteners: robot.picks(),
            }
        })
        .collect()
}

/// Builds the overall throughput/utilization summary at the given
/// (virtual-time) timestamp.
pub fn overall_report(wood: &Wood, wood_stats: &WoodStats, timestamp: f64) -> OverallReport {
    let processed_feet = wood.total_translated() * METERS_TO_FEET;
    let throughput_feet_per_8h = wood_stats.throughput_feet() * SECONDS_PER_8_HOUR_SHIFT;
    OverallReport {
        total_time: timestamp,
        total_fasteners: wood.total_picked(),
        processed_feet,
        throughput_feet_per_8h,
        board_feet_per_8h_2x12: throughput_feet_per_8h * BOARD_FEET_PER_LINEAR_FOOT_2X12,
    }
}

/// A histogram of fasteners that passed position `0` without ever being
/// picked, keyed by [`crate::fastener::Fastener::name`].
pub fn missed_fasteners_report(wood: &Wood) -> HashMap<&'static str, u64> {
    wood.missed_fasteners(0.0)
        .into_iter()
        .map(|(kind, count)| (kind.name(), count))
        .collect()
}
