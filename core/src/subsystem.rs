//! The scheduled-phase trait.
//!
//! The generator, the timeout sweep and the assignment ledger each run
//! once per tick through this trait, in the order fixed in engine.rs.
//! Player commands do not go through it.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    store::SimStore,
    types::Tick,
};

pub trait SimSubsystem: Send {
    /// Stable name, recorded as the `subsystem` column of the event log.
    fn name(&self) -> &'static str;

    /// Run this phase for `tick`.
    ///
    /// `rng` is this phase's stream for this tick only; nothing drawn
    /// from it carries over to the next tick. Interval-gated phases
    /// return an empty vec on off ticks.
    fn update(
        &mut self,
        tick: Tick,
        store: &mut SimStore,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;
}
