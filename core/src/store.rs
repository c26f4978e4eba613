//! In-memory shared simulation state.
//!
//! RULE: Subsystems read and mutate shared state only through SimStore
//! methods. Per-subsystem bookkeeping (progress timers, catalog cursors)
//! stays inside the owning subsystem.

use crate::{
    emergency::{Emergency, EmergencyStatus},
    roster::Roster,
    stats::GameStats,
};

pub struct SimStore {
    pub roster: Roster,
    emergencies: Vec<Emergency>,
    next_seq: u64,
}

impl SimStore {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            emergencies: Vec::new(),
            next_seq: 1,
        }
    }

    // ── Emergencies ────────────────────────────────────────────

    /// Reserve the next generation sequence number.
    pub fn next_emergency_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn insert_emergency(&mut self, emergency: Emergency) {
        debug_assert!(
            self.emergency(&emergency.id).is_none(),
            "duplicate emergency id {}",
            emergency.id
        );
        self.emergencies.push(emergency);
    }

    /// Full history in generation order.
    pub fn emergencies(&self) -> &[Emergency] {
        &self.emergencies
    }

    pub fn emergencies_mut(&mut self) -> impl Iterator<Item = &mut Emergency> {
        self.emergencies.iter_mut()
    }

    pub fn emergency(&self, emergency_id: &str) -> Option<&Emergency> {
        self.emergencies.iter().find(|e| e.id == emergency_id)
    }

    pub fn emergency_mut(&mut self, emergency_id: &str) -> Option<&mut Emergency> {
        self.emergencies.iter_mut().find(|e| e.id == emergency_id)
    }

    pub fn count_with_status(&self, status: EmergencyStatus) -> usize {
        self.emergencies.iter().filter(|e| e.status == status).count()
    }

    /// Active plus assigned.
    pub fn open_emergency_count(&self) -> usize {
        self.emergencies.iter().filter(|e| e.status.is_open()).count()
    }

    /// The non-terminal emergency currently held by an operator, if any.
    pub fn open_assignment_for(&self, operator_id: &str) -> Option<&Emergency> {
        self.emergencies.iter().find(|e| {
            e.status.is_open() && e.assigned_operator.as_deref() == Some(operator_id)
        })
    }

    // ── Stats ──────────────────────────────────────────────────

    pub fn compute_stats(&self) -> GameStats {
        GameStats::compute(&self.emergencies)
    }
}
