//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one simulated second.
pub type Tick = u64;

/// Simulated wall time in milliseconds since the session started.
pub type Millis = u64;

/// Length of one tick in simulated milliseconds.
pub const TICK_MS: Millis = 1_000;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;
