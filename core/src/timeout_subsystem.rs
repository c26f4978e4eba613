//! Timeout sweep: fails emergencies nobody picked up.
//!
//! Every `sweep_interval_ticks`, each emergency still `active` after
//! `max_unassigned_age_ms` becomes `failed` with a fixed resolution time.
//! Assigned emergencies are never touched; only `active` ones qualify, so
//! a second sweep cannot fail the same emergency twice.
//!
//! Execution: every tick (acts on interval boundaries).
//! Depends on: generator (sweeps what it created).

use crate::{
    config::TimeoutConfig,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    store::SimStore,
    subsystem::SimSubsystem,
    types::{Tick, TICK_MS},
};

pub struct TimeoutSubsystem {
    config: TimeoutConfig,
}

impl TimeoutSubsystem {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for TimeoutSubsystem {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn update(
        &mut self,
        tick: Tick,
        store: &mut SimStore,
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        if !tick.is_multiple_of(self.config.sweep_interval_ticks) {
            return Ok(vec![]);
        }

        let now = tick * TICK_MS;
        let mut events = Vec::new();
        for emergency in store.emergencies_mut() {
            if !emergency.time_out(now, self.config.max_unassigned_age_ms, self.config.resolution_secs) {
                continue;
            }
            log::warn!(
                "tick={tick} timeout: {} ({}) unassigned for {}s, failed",
                emergency.id,
                emergency.kind.label(),
                emergency.age_ms(now) / 1_000
            );
            events.push(SimEvent::EmergencyTimedOut {
                tick,
                emergency_id: emergency.id.clone(),
                resolution_time: self.config.resolution_secs,
            });
        }

        if !events.is_empty() {
            let stats = store.compute_stats();
            events.push(SimEvent::StatsUpdated { tick, stats });
        }
        Ok(events)
    }
}
