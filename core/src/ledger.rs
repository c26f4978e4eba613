//! Assignment ledger: who is handling what, and for how long.
//!
//! The ledger exclusively owns the progress table: one entry per
//! emergency that is `assigned` and actively timed, keyed by emergency id.
//! Nothing outside this module creates or removes entries.
//!
//! Lifecycle of an entry:
//!   1. `assign` moves an emergency active → assigned and starts timing
//!      it immediately; the operator becomes `responding`.
//!   2. Each handling tick the operator is marked `busy` until the
//!      required time has elapsed, then the outcome is rolled, the
//!      emergency is resolved, and the operator returns to `idle`.
//!   3. If the emergency leaves `assigned` any other way (player resolve,
//!      disappearance) the entry is dropped by the next cleanup pass and
//!      the operator is freed.
//!
//! Within a tick every entry is evaluated against the state as it stood
//! before any entry was applied, and each outcome roll draws from its own
//! stream keyed by the emergency's generation sequence. Evaluation order
//! therefore never changes an outcome.
//!
//! Execution: every tick, after the generator and the timeout sweep.

use crate::{
    emergency::{Emergency, EmergencyStatus, Outcome, Priority},
    error::{SimResult, TransitionError},
    event::SimEvent,
    roster::{Operator, OperatorStatus, SkillType},
    rng::SubsystemRng,
    store::SimStore,
    subsystem::SimSubsystem,
    types::{EntityId, Millis, Tick, TICK_MS},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Success chance never reaches certainty.
pub const MAX_SUCCESS_CHANCE: f64 = 0.99;
const SKILL_BONUS_WEIGHT: f64 = 0.3;
const SPECIALTY_BONUS: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentProgress {
    pub emergency_id:     EntityId,
    pub operator_id:      EntityId,
    pub start_time:       Millis,
    pub required_time_ms: Millis,
}

/// `floor(base_time * (1.5 - experience / 100))`. Experience 50 handles
/// at base speed, experience 100 in half the time.
pub fn required_time_ms(priority: Priority, experience: u8) -> Millis {
    let experience = experience.min(100) as u64;
    priority.base_time_ms() * (150 - experience) / 100
}

/// Probability that `operator` resolves an emergency of this priority
/// and type, capped at [`MAX_SUCCESS_CHANCE`].
pub fn success_chance(priority: Priority, emergency_type: &str, operator: &Operator) -> f64 {
    let skill = SkillType::for_emergency_type(emergency_type);
    let skill_bonus = operator.skills.get(skill) as f64 / 100.0 * SKILL_BONUS_WEIGHT;
    let specialty_bonus = if operator.specialty.matches(skill) { SPECIALTY_BONUS } else { 0.0 };
    (priority.base_chance() + skill_bonus + specialty_bonus).min(MAX_SUCCESS_CHANCE)
}

/// What one progress entry does this tick. Decided before any entry is
/// applied.
enum Step {
    Abandon { operator_present: bool },
    Complete { outcome: Outcome, skill: SkillType },
    Continue { mark_busy: bool },
}

pub struct AssignmentLedger {
    progress: BTreeMap<EntityId, AssignmentProgress>,
    /// Assigned emergencies whose operator is gone. Reported once.
    unstaffed: BTreeSet<EntityId>,
    skill_gain: u8,
}

impl AssignmentLedger {
    pub fn new(skill_gain: u8) -> Self {
        Self {
            progress: BTreeMap::new(),
            unstaffed: BTreeSet::new(),
            skill_gain,
        }
    }

    pub fn progress(&self, emergency_id: &str) -> Option<&AssignmentProgress> {
        self.progress.get(emergency_id)
    }

    /// In-flight entries, ordered by emergency id.
    pub fn active_progress(&self) -> impl Iterator<Item = &AssignmentProgress> {
        self.progress.values()
    }

    pub fn active_count(&self) -> usize {
        self.progress.len()
    }

    /// Assigned emergencies that cannot be timed because their operator
    /// no longer exists.
    pub fn unstaffed(&self) -> impl Iterator<Item = &EntityId> {
        self.unstaffed.iter()
    }

    // ── Commands ───────────────────────────────────────────────

    /// Put `operator_id` on `emergency_id` and start the timer.
    ///
    /// Rejected when either side is missing, the emergency is not
    /// `active`, or the operator already holds an open emergency.
    pub fn assign(
        &mut self,
        store: &mut SimStore,
        emergency_id: &str,
        operator_id: &str,
        tick: Tick,
        now: Millis,
    ) -> Result<Vec<SimEvent>, TransitionError> {
        if store.roster.find_by_id(operator_id).is_none() {
            return Err(TransitionError::OperatorNotFound {
                operator_id: operator_id.to_string(),
            });
        }
        if let Some(held) = store.open_assignment_for(operator_id) {
            return Err(TransitionError::OperatorAlreadyAssigned {
                operator_id: operator_id.to_string(),
                emergency_id: held.id.clone(),
            });
        }
        let emergency = store.emergency_mut(emergency_id).ok_or_else(|| {
            TransitionError::EmergencyNotFound {
                emergency_id: emergency_id.to_string(),
            }
        })?;
        emergency.assign(operator_id)?;

        log::info!("tick={tick} ledger: {emergency_id} assigned to {operator_id}");

        let mut events = vec![SimEvent::OperatorAssigned {
            tick,
            emergency_id: emergency_id.to_string(),
            operator_id: operator_id.to_string(),
        }];
        events.extend(self.observe_assignments(store, tick, now));
        Ok(events)
    }

    /// Close an open emergency with `outcome` and refresh stats.
    ///
    /// Does not touch the progress table; call [`Self::cleanup`] afterwards
    /// when resolving from outside the handling tick.
    pub fn resolve(
        &mut self,
        store: &mut SimStore,
        emergency_id: &str,
        outcome: Outcome,
        tick: Tick,
        now: Millis,
    ) -> Result<Vec<SimEvent>, TransitionError> {
        let emergency = store.emergency_mut(emergency_id).ok_or_else(|| {
            TransitionError::EmergencyNotFound {
                emergency_id: emergency_id.to_string(),
            }
        })?;
        emergency.resolve(outcome, now)?;

        let resolution_time = emergency.resolution_time.unwrap_or_default();
        let operator_id = emergency.assigned_operator.clone();
        log::info!(
            "tick={tick} ledger: {emergency_id} {outcome:?} after {resolution_time}s"
        );

        let stats = store.compute_stats();
        Ok(vec![
            SimEvent::EmergencyResolved {
                tick,
                emergency_id: emergency_id.to_string(),
                outcome,
                resolution_time,
                operator_id,
            },
            SimEvent::StatsUpdated { tick, stats },
        ])
    }

    // ── Passes ─────────────────────────────────────────────────

    /// Start timing every assigned emergency that has no entry yet and
    /// whose operator exists.
    pub fn observe_assignments(&mut self, store: &mut SimStore, tick: Tick, now: Millis) -> Vec<SimEvent> {
        let pending: Vec<(EntityId, EntityId, Priority)> = store
            .emergencies()
            .iter()
            .filter(|e| e.status == EmergencyStatus::Assigned && !self.progress.contains_key(&e.id))
            .filter_map(|e| {
                e.assigned_operator
                    .clone()
                    .map(|op| (e.id.clone(), op, e.priority))
            })
            .collect();

        let mut events = Vec::new();
        let mut still_unstaffed = BTreeSet::new();
        for (emergency_id, operator_id, priority) in pending {
            let Some(operator) = store.roster.find_by_id(&operator_id) else {
                if self.unstaffed.contains(&emergency_id) {
                    log::debug!("tick={tick} ledger: {emergency_id} still unstaffed");
                } else {
                    log::warn!("tick={tick} ledger: {emergency_id} assigned to unknown {operator_id}");
                }
                still_unstaffed.insert(emergency_id);
                continue;
            };
            let required = required_time_ms(priority, operator.experience);
            self.start(AssignmentProgress {
                emergency_id: emergency_id.clone(),
                operator_id: operator_id.clone(),
                start_time: now,
                required_time_ms: required,
            });
            log::debug!("tick={tick} ledger: {operator_id} handling {emergency_id} ({required}ms)");
            events.push(SimEvent::HandlingStarted {
                tick,
                emergency_id,
                operator_id: operator_id.clone(),
                required_time_ms: required,
            });
            set_status(store, tick, &operator_id, OperatorStatus::Responding, &mut events);
        }
        self.unstaffed = still_unstaffed;
        events
    }

    /// Drop entries whose emergency is already resolved or failed and
    /// free their operators.
    pub fn cleanup(&mut self, store: &mut SimStore, tick: Tick) -> Vec<SimEvent> {
        let finished: Vec<EntityId> = self
            .progress
            .keys()
            .filter(|id| store.emergency(id).is_some_and(|e| e.status.is_terminal()))
            .cloned()
            .collect();

        let mut events = Vec::new();
        for emergency_id in finished {
            if let Some(entry) = self.progress.remove(&emergency_id) {
                log::debug!("tick={tick} ledger: cleared finished {emergency_id}");
                set_status(store, tick, &entry.operator_id, OperatorStatus::Idle, &mut events);
            }
        }
        events
    }

    /// Advance every in-flight entry by one tick.
    pub fn handle_tick(
        &mut self,
        store: &mut SimStore,
        tick: Tick,
        now: Millis,
        rng: &SubsystemRng,
    ) -> Vec<SimEvent> {
        let mut events = self.cleanup(store, tick);
        events.extend(self.observe_assignments(store, tick, now));

        let steps: Vec<(AssignmentProgress, Step)> = self
            .progress
            .values()
            .map(|entry| (entry.clone(), decide(entry, store, now, rng)))
            .collect();

        for (entry, step) in steps {
            match step {
                Step::Abandon { operator_present } => {
                    self.progress.remove(&entry.emergency_id);
                    log::debug!("tick={tick} ledger: abandoned {}", entry.emergency_id);
                    events.push(SimEvent::HandlingAbandoned {
                        tick,
                        emergency_id: entry.emergency_id.clone(),
                        operator_id: entry.operator_id.clone(),
                    });
                    if operator_present {
                        set_status(store, tick, &entry.operator_id, OperatorStatus::Idle, &mut events);
                    }
                }
                Step::Complete { outcome, skill } => {
                    match self.resolve(store, &entry.emergency_id, outcome, tick, now) {
                        Ok(resolved) => events.extend(resolved),
                        Err(e) => log::warn!("tick={tick} ledger: {e}"),
                    }
                    if outcome == Outcome::Resolved {
                        if let Some(new_value) =
                            store.roster.improve_skill(&entry.operator_id, skill, self.skill_gain)
                        {
                            log::info!(
                                "tick={tick} ledger: {} improved {skill:?} to {new_value}",
                                entry.operator_id
                            );
                            events.push(SimEvent::SkillImproved {
                                tick,
                                operator_id: entry.operator_id.clone(),
                                skill,
                                new_value,
                            });
                        }
                    }
                    set_status(store, tick, &entry.operator_id, OperatorStatus::Idle, &mut events);
                    self.progress.remove(&entry.emergency_id);
                }
                Step::Continue { mark_busy } => {
                    if mark_busy {
                        set_status(store, tick, &entry.operator_id, OperatorStatus::Busy, &mut events);
                    }
                }
            }
        }
        events
    }

    /// Forget every entry without touching the store. Used on reset.
    pub fn clear(&mut self) {
        self.progress.clear();
        self.unstaffed.clear();
    }

    fn start(&mut self, entry: AssignmentProgress) {
        debug_assert!(
            !self.progress.contains_key(&entry.emergency_id),
            "duplicate progress entry for {}",
            entry.emergency_id
        );
        self.progress.insert(entry.emergency_id.clone(), entry);
    }
}

impl SimSubsystem for AssignmentLedger {
    fn name(&self) -> &'static str {
        "handling"
    }

    fn update(
        &mut self,
        tick: Tick,
        store: &mut SimStore,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(self.handle_tick(store, tick, tick * TICK_MS, rng))
    }
}

fn decide(entry: &AssignmentProgress, store: &SimStore, now: Millis, rng: &SubsystemRng) -> Step {
    let emergency: Option<&Emergency> = store
        .emergency(&entry.emergency_id)
        .filter(|e| e.status == EmergencyStatus::Assigned);
    let operator = store.roster.find_by_id(&entry.operator_id);

    let (Some(emergency), Some(operator)) = (emergency, operator) else {
        return Step::Abandon { operator_present: operator.is_some() };
    };

    let elapsed = now.saturating_sub(entry.start_time);
    if elapsed >= entry.required_time_ms {
        let chance = success_chance(emergency.priority, emergency.kind.label(), operator);
        let mut roll = rng.derive(emergency.seq);
        let outcome = if roll.chance(chance) { Outcome::Resolved } else { Outcome::Failed };
        return Step::Complete { outcome, skill: emergency.kind.skill() };
    }

    Step::Continue { mark_busy: operator.status != OperatorStatus::Busy }
}

fn set_status(
    store: &mut SimStore,
    tick: Tick,
    operator_id: &str,
    status: OperatorStatus,
    events: &mut Vec<SimEvent>,
) {
    let changed = store
        .roster
        .find_by_id(operator_id)
        .is_some_and(|op| op.status != status);
    if changed && store.roster.set_status(operator_id, status) {
        events.push(SimEvent::OperatorStatusChanged {
            tick,
            operator_id: operator_id.to_string(),
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Skills, Specialty};

    fn operator(specialty: Specialty, skill: u8) -> Operator {
        Operator {
            id: "operator-1".into(),
            name: "Alex Chen".into(),
            specialty,
            skills: Skills::uniform(skill),
            experience: 70,
            status: OperatorStatus::Idle,
            assigned_workstation: Some("1".into()),
        }
    }

    #[test]
    fn required_time_scales_with_experience() {
        assert_eq!(required_time_ms(Priority::Critical, 100), 12_500);
        assert_eq!(required_time_ms(Priority::Low, 50), 10_000);
        assert_eq!(required_time_ms(Priority::Medium, 73), 11_550);
        assert_eq!(required_time_ms(Priority::High, 0), 30_000);
    }

    #[test]
    fn success_chance_is_capped() {
        let op = operator(Specialty::Fire, 80);
        let chance = success_chance(Priority::Medium, "Fire Alert", &op);
        assert!((chance - 0.99).abs() < 1e-9, "chance = {chance}");
    }

    #[test]
    fn specialty_bonus_only_on_matching_skill() {
        let op = operator(Specialty::Medical, 50);
        let matched = success_chance(Priority::Critical, "Medical Emergency", &op);
        let unmatched = success_chance(Priority::Critical, "Security Breach", &op);
        assert!((matched - (0.65 + 0.15 + 0.1)).abs() < 1e-9);
        assert!((unmatched - (0.65 + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn general_specialty_never_gets_bonus() {
        let op = operator(Specialty::General, 0);
        let chance = success_chance(Priority::High, "Noise Complaint", &op);
        assert!((chance - 0.75).abs() < 1e-9);
    }
}
