//! The contract every simulated entity obeys (spec.md §4.1).
//!
//! An actor behaves as a long-lived, restartable lazy sequence: each call to
//! `step` advances it by one cooperative slice. Languages with first-class
//! coroutines model this as a generator; here each implementor keeps an
//! explicit `phase` enum as its "program counter" across calls, per the
//! state-machine idiom spec.md §9 recommends.

/// An opaque visualization primitive. The core never inspects this type —
/// only the (out-of-scope) visualization collaborator would — so it carries
/// no fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geometry;

pub trait Actor {
    /// Advance one cooperative slice.
    ///
    /// Returns `Some(seconds)` to request being dormant until virtual time
    /// has advanced by exactly `seconds` (`seconds` must be strictly
    /// positive), or `None` to yield back to the Runtime without requesting
    /// time to pass.
    fn step(&mut self) -> Option<f64>;

    /// Geometries for the visualization collaborator. The core treats the
    /// result opaquely; the default does nothing.
    fn draw(&self) -> Vec<Geometry> {
        Vec::new()
    }

    /// A human-readable label used in trace spans and reports.
    fn name(&self) -> &str;
}
