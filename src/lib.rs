//! Deterministic, time-stepped discrete-event simulator for a linear
//! fastener-removal manufacturing line.
//!
//! The three load-bearing subsystems are [`runtime`] (the cooperative
//! virtual-time scheduler), [`wood`] (the moving workpiece and its
//! work/move mutual-exclusion protocol) and [`conveyor`] (the policies that
//! decide how far to advance the board each cycle). Everything else —
//! [`cell`], [`stats`], [`config`], [`report`] — is the glue that turns a
//! declarative configuration into a running simulation and a set of
//! accessors a reporting adapter can read.

pub mod actor;
pub mod cell;
pub mod clock;
pub mod config;
pub mod conveyor;
pub mod error;
pub mod fastener;
pub mod report;
pub mod rng;
pub mod runtime;
pub mod stats;
pub mod surface;
pub mod wood;

pub use actor::{Actor, Geometry};
pub use clock::Clock;
pub use config::{build_runtime, SimConfig, Simulation};
pub use error::{ConfigError, RuntimeError, WoodError};
pub use fastener::{Fastener, FastenerRecord};
pub use report::{missed_fasteners_report, overall_report, robot_reports, OverallReport, RobotReport};
pub use rng::SimRng;
pub use runtime::Runtime;
pub use surface::Surface;
pub use wood::Wood;
