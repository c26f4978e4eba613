//! Read-only view of the whole session for presentation.
//!
//! Built on demand from engine state; polling it has no side effects.

use crate::{
    clock::SimSpeed,
    emergency::{Emergency, EmergencyStatus},
    ledger::AssignmentProgress,
    roster::Operator,
    session::SessionState,
    types::{Millis, RunId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub run_id: RunId,
    pub tick: Tick,
    pub now_ms: Millis,
    pub paused: bool,
    pub speed: SimSpeed,
    /// Real milliseconds a display should wait between ticks.
    pub tick_interval_ms: u64,
    /// Shift time as `MM:SS`.
    pub elapsed: String,
    pub operators: Vec<Operator>,
    pub emergencies: Vec<Emergency>,
    pub handling: Vec<AssignmentProgress>,
    pub session: SessionState,
    pub active_emergencies: usize,
    pub idle_operators: usize,
    pub ignored_commands: u64,
}

impl SimSnapshot {
    /// Emergencies still waiting for an operator, oldest first.
    pub fn unassigned(&self) -> impl Iterator<Item = &Emergency> {
        self.emergencies
            .iter()
            .filter(|e| e.status == EmergencyStatus::Active)
    }
}
