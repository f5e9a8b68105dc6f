//! Turns a declarative YAML document into a running [`Runtime`] plus the
//! handles the [`crate::report`] module needs (spec.md §6; grounded on
//! `roboregress/robot/configuration.py`'s `runtime_from_file`).
//!
//! Non-goal §1 excludes the *choice of parsing library* from the core's
//! design content, not the instantiation logic below that turns a parsed
//! document into a wired-up simulation — that part is the "Configuration
//! glue" component in §2's component table.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::actor::Actor;
use crate::cell::rake::RakeCell;
use crate::cell::rolling_rake::RollingRakeCell;
use crate::cell::single_pick::SinglePickCell;
use crate::cell::{Cell, CellDescriptor, CellParameters};
use crate::clock::Clock;
use crate::conveyor::{Conveyor, ConveyorPolicy};
use crate::error::ConfigError;
use crate::fastener::Fastener;
use crate::runtime::Runtime;
use crate::stats::{RobotStats, StatsTracker, WoodStats};
use crate::surface::Surface;
use crate::wood::{SharedWood, Wood};

/// Sentinel for `start_pos`/`working_width`: "auto-place sequentially using
/// the defaults" (spec.md §6).
const AUTO_PLACE: f64 = -1.0;

fn auto_place() -> f64 {
    AUTO_PLACE
}

#[derive(Debug, Clone, Deserialize)]
pub struct WoodConfig {
    pub fastener_densities: HashMap<Fastener, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConveyorConfig {
    Dumb {
        move_increment: f64,
        move_speed: f64,
    },
    GreedyDistance {
        move_speed: f64,
    },
    GreedyBusyness {
        move_speed: f64,
        optimization_increment: f64,
    },
}

/// One entry of the `pickers` list. Tagged by kind per spec.md §6; each
/// entry yields one cell per [`Surface`] (four cells) once instantiated.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PickerConfig {
    Rake {
        #[serde(default = "auto_place")]
        start_pos: f64,
        #[serde(default = "auto_place")]
        working_width: f64,
        rake_cycle_seconds: f64,
        pick_probabilities: HashMap<Fastener, f64>,
    },
    RollingRake {
        #[serde(default = "auto_place")]
        start_pos: f64,
        #[serde(default = "auto_place")]
        working_width: f64,
        rolling_rake_cycle_seconds: f64,
        pick_probabilities: HashMap<Fastener, f64>,
    },
    BigBird {
        #[serde(default = "auto_place")]
        start_pos: f64,
        #[serde(default = "auto_place")]
        working_width: f64,
        big_bird_pick_seconds: f64,
        pick_probabilities: HashMap<Fastener, f64>,
    },
    Screw {
        #[serde(default = "auto_place")]
        start_pos: f64,
        #[serde(default = "auto_place")]
        working_width: f64,
        screw_pick_seconds: f64,
        pick_probabilities: HashMap<Fastener, f64>,
    },
}

impl PickerConfig {
    fn start_pos(&self) -> f64 {
        match self {
            PickerConfig::Rake { start_pos, .. }
            | PickerConfig::RollingRake { start_pos, .. }
            | PickerConfig::BigBird { start_pos, .. }
            | PickerConfig::Screw { start_pos, .. } => *start_pos,
        }
    }

    fn working_width(&self) -> f64 {
        match self {
            PickerConfig::Rake { working_width, .. }
            | PickerConfig::RollingRake { working_width, .. }
            | PickerConfig::BigBird { working_width, .. }
            | PickerConfig::Screw { working_width, .. } => *working_width,
        }
    }

    fn pick_probabilities(&self) -> &HashMap<Fastener, f64> {
        match self {
            PickerConfig::Rake { pick_probabilities, .. }
            | PickerConfig::RollingRake { pick_probabilities, .. }
            | PickerConfig::BigBird { pick_probabilities, .. }
            | PickerConfig::Screw { pick_probabilities, .. } => pick_probabilities,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            PickerConfig::Rake { .. } => "Rake",
            PickerConfig::RollingRake { .. } => "RollingRake",
            PickerConfig::BigBird { .. } => "BigBird",
            PickerConfig::Screw { .. } => "ScrewManipulator",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub wood: WoodConfig,
    pub conveyor: ConveyorConfig,
    pub default_cell_distance: f64,
    pub default_cell_width: f64,
    pub pickers: Vec<PickerConfig>,
}

impl SimConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for kind in Fastener::ALL {
            match self.wood.fastener_densities.get(&kind) {
                None => return Err(ConfigError::MissingFastenerDensity(kind.name())),
                Some(&density) if density < 0.0 => {
                    return Err(ConfigError::NegativeFastenerDensity { kind: kind.name(), density })
                }
                Some(_) => {}
            }
        }

        for picker in &self.pickers {
            for (&kind, &probability) in picker.pick_probabilities() {
                if !(probability > 0.0 && probability <= 1.0) {
                    return Err(ConfigError::InvalidPickProbability {
                        kind: kind.name(),
                        probability,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Everything a CLI adapter needs after wiring a [`SimConfig`] into a
/// runnable simulation: the stepped [`Runtime`], the shared [`Wood`]
/// handle and the stats collectors the [`crate::report`] module reads.
pub struct Simulation {
    pub runtime: Runtime,
    pub wood: SharedWood,
    pub stats: StatsTracker,
    pub wood_stats: WoodStats,
}

/// Instantiates a [`Simulation`] from a validated configuration. Mirrors
/// `runtime_from_file`: one cell per `(picker, surface)` pair, auto-placed
/// sequentially when `start_pos`/`working_width` are left at the `-1`
/// sentinel, then a single conveyor wired to every cell's descriptor.
///
/// Fails with [`ConfigError::DuplicateCell`] if two pickers resolve to the
/// same `(start_pos, end_pos, surface)` placement — a construction-time
/// configuration error (spec.md §7), not a process-aborting bug.
pub fn build_runtime(config: &SimConfig) -> Result<Simulation, ConfigError> {
    let clock = Clock::new();
    let wood = Wood::new(config.wood.fastener_densities.clone());
    let mut runtime = Runtime::new(clock.clone());
    let mut stats = StatsTracker::new();
    let wood_stats = WoodStats::new(Rc::clone(&wood), clock.clone());

    let mut next_auto_start = 0.0_f64;
    let mut descriptors: Vec<CellDescriptor> = Vec::new();
    let mut cell_actors: Vec<Box<dyn Actor>> = Vec::new();

    for picker in &config.pickers {
        let start_pos = if picker.start_pos() < 0.0 {
            next_auto_start
        } else {
            picker.start_pos()
        };
        let working_width = if picker.working_width() < 0.0 {
            config.default_cell_width
        } else {
            picker.working_width()
        };
        next_auto_start = start_pos + working_width + config.default_cell_distance;

        for surface in Surface::ALL {
            let params = CellParameters {
                start_pos,
                working_width,
                pickable_surface: surface,
                pick_probabilities: picker.pick_probabilities().clone(),
            };
            let end_pos = params.end_pos();
            let robot_stats = stats.register(RobotStats::new(
                picker.type_name(),
                start_pos,
                end_pos,
                surface,
                clock.clone(),
            ))?;

            let actor: Box<dyn Actor> = match picker {
                PickerConfig::Rake { rake_cycle_seconds, .. } => {
                    let cell = Cell::new(
                        Rc::clone(&wood),
                        params,
                        RakeCell::new(*rake_cycle_seconds),
                        robot_stats,
                    );
                    descriptors.push(cell.descriptor());
                    Box::new(cell)
                }
                PickerConfig::RollingRake { rolling_rake_cycle_seconds, .. } => {
                    let cell = Cell::new(
                        Rc::clone(&wood),
                        params,
                        RollingRakeCell::new(*rolling_rake_cycle_seconds),
                        robot_stats,
                    );
                    descriptors.push(cell.descriptor());
                    Box::new(cell)
                }
                PickerConfig::BigBird { big_bird_pick_seconds, .. } => {
                    let cell = Cell::new(
                        Rc::clone(&wood),
                        params,
                        SinglePickCell::big_bird(*big_bird_pick_seconds),
                        robot_stats,
                    );
                    descriptors.push(cell.descriptor());
                    Box::new(cell)
                }
                PickerConfig::Screw { screw_pick_seconds, .. } => {
                    let cell = Cell::new(
                        Rc::clone(&wood),
                        params,
                        SinglePickCell::screw_manipulator(*screw_pick_seconds),
                        robot_stats,
                    );
                    descriptors.push(cell.descriptor());
                    Box::new(cell)
                }
            };
            cell_actors.push(actor);
        }
    }

    let (policy, move_speed) = match &config.conveyor {
        ConveyorConfig::Dumb { move_increment, move_speed } => {
            (ConveyorPolicy::Dumb { move_increment: *move_increment }, *move_speed)
        }
        ConveyorConfig::GreedyDistance { move_speed } => (ConveyorPolicy::GreedyDistance, *move_speed),
        ConveyorConfig::GreedyBusyness { move_speed, optimization_increment } => (
            ConveyorPolicy::GreedyBusyness { optimization_increment: *optimization_increment },
            *move_speed,
        ),
    };
    let conveyor = Conveyor::new(Rc::clone(&wood), descriptors, move_speed, policy, wood_stats.timer.clone());
    runtime.register(Box::new(conveyor));

    for actor in cell_actors {
        runtime.register(actor);
    }

    Ok(Simulation { runtime, wood, stats, wood_stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
wood:
  fastener_densities:
    offset_nail: 0.5
    flush_nail: 0.3
    staple: 0.4
    screw: 0.2
conveyor:
  type: dumb
  move_increment: 2.0
  move_speed: 1.0
default_cell_distance: 1.0
default_cell_width: 4.0
pickers:
  - type: rake
    rake_cycle_seconds: 3.0
    pick_probabilities:
      staple: 1.0
  - type: big_bird
    big_bird_pick_seconds: 2.0
    pick_probabilities:
      offset_nail: 0.9
      flush_nail: 0.9
  - type: screw
    screw_pick_seconds: 1.5
    start_pos: 20.0
    working_width: 5.0
    pick_probabilities:
      screw: 0.95
"#
    }

    #[test]
    fn parses_and_validates_a_full_config() {
        let config: SimConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.pickers.len(), 3);
    }

    #[test]
    fn missing_fastener_density_is_rejected() {
        let yaml = r#"
wood:
  fastener_densities:
    offset_nail: 0.5
    flush_nail: 0.3
    staple: 0.4
conveyor:
  type: dumb
  move_increment: 2.0
  move_speed: 1.0
default_cell_distance: 1.0
default_cell_width: 4.0
pickers: []
"#;
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingFastenerDensity(_))));
    }

    #[test]
    fn out_of_range_pick_probability_is_rejected() {
        let yaml = r#"
wood:
  fastener_densities:
    offset_nail: 0.0
    flush_nail: 0.0
    staple: 0.0
    screw: 0.0
conveyor:
  type: dumb
  move_increment: 2.0
  move_speed: 1.0
default_cell_distance: 1.0
default_cell_width: 4.0
pickers:
  - type: rake
    rake_cycle_seconds: 3.0
    pick_probabilities:
      staple: 1.5
"#;
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPickProbability { .. })));
    }

    #[test]
    fn unknown_picker_tag_fails_to_parse() {
        let yaml = r#"
wood:
  fastener_densities:
    offset_nail: 0.0
    flush_nail: 0.0
    staple: 0.0
    screw: 0.0
conveyor:
  type: dumb
  move_increment: 2.0
  move_speed: 1.0
default_cell_distance: 1.0
default_cell_width: 4.0
pickers:
  - type: laser_drill
    pick_probabilities: {}
"#;
        let result: Result<SimConfig, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn build_runtime_auto_places_cells_and_wires_one_per_surface() {
        let config: SimConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        config.validate().unwrap();
        let sim = build_runtime(&config).unwrap();

        // 3 pickers * 4 surfaces + 1 conveyor actor.
        assert_eq!(sim.runtime.actor_count(), 3 * 4 + 1);
        assert_eq!(sim.stats.robots().len(), 3 * 4);
    }

    #[test]
    fn explicit_start_pos_overrides_auto_placement() {
        let config: SimConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let sim = build_runtime(&config).unwrap();
        let screw_robot = sim
            .stats
            .robots()
            .iter()
            .find(|r| r.borrow().cell_type_name == "ScrewManipulator")
            .unwrap();
        assert_eq!(screw_robot.borrow().start_pos, 20.0);
        assert_eq!(screw_robot.borrow().end_pos, 25.0);
    }

    #[test]
    fn duplicate_cell_placement_is_a_recoverable_config_error() {
        // Two `screw` pickers with the same explicit start_pos/working_width
        // resolve to identical (start_pos, end_pos, surface) cells.
        let yaml = r#"
wood:
  fastener_densities:
    offset_nail: 0.0
    flush_nail: 0.0
    staple: 0.0
    screw: 0.5
conveyor:
  type: dumb
  move_increment: 2.0
  move_speed: 1.0
default_cell_distance: 1.0
default_cell_width: 4.0
pickers:
  - type: screw
    screw_pick_seconds: 1.5
    start_pos: 10.0
    working_width: 5.0
    pick_probabilities:
      screw: 0.95
  - type: screw
    screw_pick_seconds: 1.5
    start_pos: 10.0
    working_width: 5.0
    pick_probabilities:
      screw: 0.95
"#;
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        let result = build_runtime(&config);
        assert!(matches!(result, Err(ConfigError::DuplicateCell { .. })));
    }
}
