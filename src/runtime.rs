//! The cooperative virtual-time scheduler (spec.md §4.2).
//!
//! Repeatedly selects the earliest-due actor, resumes its cooperative step,
//! records any requested sleep, and advances virtual time to the next
//! wake-up. Single-threaded: actor code runs to completion between yields,
//! atomically from every other actor's perspective.

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::actor::Actor;
use crate::clock::Clock;
use crate::error::RuntimeError;

/// Wake-time timestamps are rounded to this many decimal places to damp
/// floating-point drift across many accumulated sleeps.
const WAKE_TIME_DECIMALS: i32 = 10;

fn round_wake_time(t: f64) -> f64 {
    let scale = 10f64.powi(WAKE_TIME_DECIMALS);
    (t * scale).round() / scale
}

pub struct Runtime {
    clock: Clock,
    actors: Vec<Box<dyn Actor>>,
    /// actor index -> wake-up timestamp, for actors currently dormant.
    sleeping: HashMap<usize, f64>,
}

impl Runtime {
    pub fn new(clock: Clock) -> Self {
        Runtime {
            clock,
            actors: Vec::new(),
            sleeping: HashMap::new(),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn timestamp(&self) -> f64 {
        self.clock.now()
    }

    /// Registers a new actor. Registration order is fixed at setup and
    /// determines stepping order within a pass. Rust's move semantics make
    /// registering the same actor object twice structurally impossible —
    /// see DESIGN.md Open Question 2.
    pub fn register(&mut self, actor: Box<dyn Actor>) {
        self.actors.push(actor);
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Advances the simulation by one scheduling pass.
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        if self.actors.is_empty() {
            return Err(RuntimeError::NoObjectsToStep);
        }

        if !self.sleeping.is_empty() {
            let t_next = self
                .sleeping
                .values()
                .copied()
                .fold(f64::INFINITY, f64::min);
            if t_next < self.clock.now() {
                return Err(RuntimeError::InconsistentWakeTime {
                    next: t_next,
                    current: self.clock.now(),
                });
            }
            self.clock.set(t_next);
        }

        for idx in 0..self.actors.len() {
            if let Some(&wake_at) = self.sleeping.get(&idx) {
                if self.clock.now() < wake_at {
                    continue;
                }
                self.sleeping.remove(&idx);
            }

            let sleep_request = self.actors[idx].step();

            if let Some(seconds) = sleep_request {
                if seconds <= 0.0 {
                    return Err(RuntimeError::NonPositiveSleep {
                        actor: self.actors[idx].name().to_string(),
                        seconds,
                    });
                }
                let wake_at = round_wake_time(self.clock.now() + seconds);
                trace!(actor = self.actors[idx].name(), wake_at, "actor scheduled sleep");
                self.sleeping.insert(idx, wake_at);
            }
        }

        Ok(())
    }

    /// Repeatedly steps until virtual time reaches or passes `target`.
    ///
    /// `on_progress`, if given, is called with the clamped current
    /// timestamp after every step — the hook the CLI adapter uses to drive
    /// a progress bar. The core never renders progress itself (§1
    /// Non-goal).
    pub fn step_until(
        &mut self,
        target: f64,
        mut on_progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<(), RuntimeError> {
        let mut consecutive_without_change: u32 = 0;

        while self.clock.now() < target {
            let before = self.clock.now();
            self.step()?;

            if self.clock.now() == before {
                consecutive_without_change += 1;
            } else {
                consecutive_without_change = 0;
            }

            if consecutive_without_change > 1 {
                warn!(timestamp = self.clock.now(), "no timestamp progression");
                return Err(RuntimeError::NoTimestampProgression {
                    consecutive: consecutive_without_change,
                    timestamp: self.clock.now(),
                });
            }

            if let Some(cb) = on_progress.as_deref_mut() {
                cb(self.clock.now().min(target));
            }
        }

        Ok(())
    }
}
