//! The simulation engine: the heart of the operations center.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Generator     (every `generation.interval_ticks`)
//!   2. Timeout sweep (every `timeout.sweep_interval_ticks`)
//!   3. Handling      (every tick: the assignment ledger)
//!
//! RULES:
//!   - One tick is one simulated second.
//!   - A session starts running. While the clock is paused no tick runs;
//!     `run_ticks` and `advance_real` return without advancing.
//!   - Player commands apply immediately, between ticks, at the current
//!     tick's timestamp, paused or not.
//!   - All randomness flows through the RngBank.
//!   - All state changes are recorded in the event log.
//!   - A command naming a missing entity, or an emergency in the wrong
//!     state, is ignored: logged, counted, and recorded as
//!     `CommandIgnored`, never returned as an error.

use crate::{
    clock::SimClock,
    command::PlayerCommand,
    config::SimConfig,
    emergency::{Emergency, EmergencyStatus, Outcome},
    error::{SimResult, TransitionError},
    event::{EventLogEntry, SimEvent},
    generator_subsystem::GeneratorSubsystem,
    ledger::AssignmentLedger,
    roster::{is_workstation_slot, Operator, Roster},
    rng::{RngBank, SubsystemSlot},
    session::{Room, SessionState},
    snapshot::SimSnapshot,
    store::SimStore,
    subsystem::SimSubsystem,
    timeout_subsystem::TimeoutSubsystem,
    types::{EntityId, RunId, Tick},
};

const PLAYER: &str = "player";
const ENGINE: &str = "engine";

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    pub store:    SimStore,
    pub session:  SessionState,
    seed:         u64,
    config:       SimConfig,
    generator:    GeneratorSubsystem,
    timeout:      TimeoutSubsystem,
    ledger:       AssignmentLedger,
    event_log:    Vec<EventLogEntry>,
    ignored_commands: u64,
}

impl SimEngine {
    /// Build a fully wired session: roster rolled, catalog shuffled,
    /// clock running at tick 0.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(seed);

        let mut roster_rng = rng_bank.for_subsystem_at_tick(SubsystemSlot::Roster, 0);
        let roster = Roster::create(&config.operator_names, &mut roster_rng);
        let mut catalog_rng = rng_bank.for_subsystem_at_tick(SubsystemSlot::Generator, 0);
        let generator = GeneratorSubsystem::new(config.generation.clone(), &mut catalog_rng);

        let mut engine = Self {
            clock:     SimClock::new(run_id.clone()),
            rng_bank,
            store:     SimStore::new(roster),
            session:   SessionState::new(),
            seed,
            timeout:   TimeoutSubsystem::new(config.timeout.clone()),
            ledger:    AssignmentLedger::new(config.skill_gain),
            generator,
            config,
            event_log: Vec::new(),
            ignored_commands: 0,
            run_id,
        };
        engine.clock.resume();

        let init = SimEvent::RunInitialized {
            run_id: engine.run_id.clone(),
            seed,
        };
        engine.record(0, ENGINE, &[init])?;
        log::info!("run {}: initialized with seed {seed}", engine.run_id);
        Ok(engine)
    }

    /// Engine with default config. Used by tests and tooling.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::new(run_id, seed, SimConfig::default())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Advance one tick. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        assert!(!self.clock.paused, "tick() called on paused engine");

        let current_tick = self.clock.advance();
        let mut tick_events = vec![SimEvent::TickStarted { tick: current_tick }];

        let Self {
            generator,
            timeout,
            ledger,
            store,
            rng_bank,
            run_id,
            event_log,
            ..
        } = self;

        // EXECUTION ORDER: fixed, never reordered.
        let phases: [(SubsystemSlot, &mut dyn SimSubsystem); 3] = [
            (SubsystemSlot::Generator, generator as &mut dyn SimSubsystem),
            (SubsystemSlot::Timeout, timeout as &mut dyn SimSubsystem),
            (SubsystemSlot::Handling, ledger as &mut dyn SimSubsystem),
        ];
        for (slot, subsystem) in phases {
            let mut rng = rng_bank.for_subsystem_at_tick(slot, current_tick);
            let new_events = subsystem.update(current_tick, store, &mut rng)?;
            append_events(event_log, run_id.as_str(), current_tick, subsystem.name(), &new_events)?;
            tick_events.extend(new_events);
        }

        tick_events.push(SimEvent::TickCompleted { tick: current_tick });
        self.absorb_stats(&tick_events);
        Ok(tick_events)
    }

    /// Run up to n ticks. Returns how many ran: none while paused.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<u64> {
        if self.clock.paused {
            if n > 0 {
                log::warn!("tick={} engine: paused, {n} tick(s) not run", self.clock.current_tick);
            }
            return Ok(0);
        }
        for _ in 0..n {
            self.tick()?;
        }
        Ok(n)
    }

    /// Catch up on `real_ms` of wall time at the current speed.
    pub fn advance_real(&mut self, real_ms: u64) -> SimResult<u64> {
        let owed = self.clock.ticks_for_real_ms(real_ms);
        self.run_ticks(owed)
    }

    // ── Player commands ────────────────────────────────────────

    /// Apply one player command at the current tick.
    pub fn apply_command(&mut self, command: PlayerCommand) -> SimResult<Vec<SimEvent>> {
        let tick = self.clock.current_tick;
        let now = self.clock.now_ms();
        let command_type = command.type_name();

        let result: Result<Vec<SimEvent>, TransitionError> = match command {
            PlayerCommand::Pause => {
                self.clock.pause();
                Ok(vec![])
            }
            PlayerCommand::Resume => {
                self.clock.resume();
                Ok(vec![])
            }
            PlayerCommand::SetSpeed { speed } => {
                self.clock.set_speed(speed);
                Ok(vec![])
            }
            PlayerCommand::SelectOperator { operator_id } => {
                self.session.set_selected_operator(operator_id.clone());
                Ok(vec![SimEvent::OperatorSelected { tick, operator_id }])
            }
            PlayerCommand::SelectWorkstation { workstation_id } => {
                self.session.set_selected_workstation(workstation_id);
                Ok(vec![])
            }
            PlayerCommand::SetCurrentRoom { room } => {
                self.session.set_current_room(room);
                Ok(vec![SimEvent::RoomChanged { tick, room }])
            }
            PlayerCommand::AssignOperator { emergency_id, operator_id } => {
                self.ledger
                    .assign(&mut self.store, &emergency_id, &operator_id, tick, now)
            }
            PlayerCommand::ResolveEmergency { emergency_id, outcome } => self
                .ledger
                .resolve(&mut self.store, &emergency_id, outcome, tick, now)
                .map(|mut events| {
                    events.extend(self.ledger.cleanup(&mut self.store, tick));
                    events
                }),
            PlayerCommand::AssignWorkstation { operator_id, workstation_id } => {
                if !is_workstation_slot(&workstation_id) {
                    Err(TransitionError::WorkstationNotFound { workstation_id })
                } else if self.store.roster.assign_workstation(&operator_id, &workstation_id) {
                    Ok(vec![])
                } else {
                    Err(TransitionError::OperatorNotFound { operator_id })
                }
            }
            PlayerCommand::ResetGame => return self.reset_game(),
        };

        let mut events = vec![SimEvent::PlayerCommandReceived {
            tick,
            command_type: command_type.to_string(),
        }];
        match result {
            Ok(applied) => events.extend(applied),
            Err(rejected) => {
                self.ignored_commands += 1;
                log::warn!("tick={tick} command {command_type} ignored: {rejected}");
                events.push(SimEvent::CommandIgnored {
                    tick,
                    command_type: command_type.to_string(),
                    reason: rejected.reason().to_string(),
                    detail: rejected.to_string(),
                });
            }
        }

        self.record(tick, PLAYER, &events)?;
        self.absorb_stats(&events);
        Ok(events)
    }

    pub fn select_operator(&mut self, operator_id: Option<&str>) -> SimResult<Vec<SimEvent>> {
        self.apply_command(PlayerCommand::SelectOperator {
            operator_id: operator_id.map(str::to_string),
        })
    }

    pub fn assign_operator(&mut self, emergency_id: &str, operator_id: &str) -> SimResult<Vec<SimEvent>> {
        self.apply_command(PlayerCommand::AssignOperator {
            emergency_id: emergency_id.to_string(),
            operator_id:  operator_id.to_string(),
        })
    }

    pub fn resolve_emergency(&mut self, emergency_id: &str, outcome: Outcome) -> SimResult<Vec<SimEvent>> {
        self.apply_command(PlayerCommand::ResolveEmergency {
            emergency_id: emergency_id.to_string(),
            outcome,
        })
    }

    pub fn set_current_room(&mut self, room: Room) -> SimResult<Vec<SimEvent>> {
        self.apply_command(PlayerCommand::SetCurrentRoom { room })
    }

    /// Start the session over from the original seed: fresh roster,
    /// empty history, clock back at tick 0, session state cleared.
    pub fn reset_game(&mut self) -> SimResult<Vec<SimEvent>> {
        let fresh = Self::new(self.run_id.clone(), self.seed, self.config.clone())?;
        *self = fresh;

        let events = vec![SimEvent::GameReset { tick: 0 }];
        self.record(0, PLAYER, &events)?;
        log::info!("run {}: game reset", self.run_id);
        Ok(events)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn operators(&self) -> &[Operator] {
        self.store.roster.operators()
    }

    pub fn emergencies(&self) -> &[Emergency] {
        self.store.emergencies()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    /// Commands dropped for naming a missing entity or an emergency in
    /// the wrong state.
    pub fn ignored_commands(&self) -> u64 {
        self.ignored_commands
    }

    pub fn event_log(&self) -> &[EventLogEntry] {
        &self.event_log
    }

    /// Logged events for a specific tick, in emission order.
    /// Used by the determinism test and replay tooling.
    pub fn events_for_tick(&self, tick: Tick) -> Vec<&EventLogEntry> {
        self.event_log.iter().filter(|e| e.tick == tick).collect()
    }

    /// Oldest emergency still waiting for an operator.
    pub fn oldest_unassigned(&self) -> Option<&Emergency> {
        self.store
            .emergencies()
            .iter()
            .find(|e| e.status == EmergencyStatus::Active)
    }

    pub fn idle_operator_ids(&self) -> Vec<EntityId> {
        self.store
            .roster
            .list_idle()
            .into_iter()
            .map(|op| op.id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            run_id:   self.run_id.clone(),
            tick:     self.clock.current_tick,
            now_ms:   self.clock.now_ms(),
            paused:   self.clock.paused,
            speed:    self.clock.speed,
            tick_interval_ms: self.clock.real_ms_per_tick(),
            elapsed:  self.clock.elapsed_label(),
            operators:   self.operators().to_vec(),
            emergencies: self.emergencies().to_vec(),
            handling:    self.ledger.active_progress().cloned().collect(),
            session:     self.session.clone(),
            active_emergencies: self.store.count_with_status(EmergencyStatus::Active),
            idle_operators:     self.store.roster.list_idle().len(),
            ignored_commands:   self.ignored_commands,
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn record(&mut self, tick: Tick, subsystem: &str, events: &[SimEvent]) -> SimResult<()> {
        append_events(&mut self.event_log, &self.run_id, tick, subsystem, events)
    }

    /// Copy the latest stats recomputation into session state.
    fn absorb_stats(&mut self, events: &[SimEvent]) {
        let latest = events.iter().rev().find_map(|e| match e {
            SimEvent::StatsUpdated { stats, .. } => Some(*stats),
            _ => None,
        });
        if let Some(stats) = latest {
            self.session.update_stats(stats);
        }
    }
}

fn append_events(
    log: &mut Vec<EventLogEntry>,
    run_id: &str,
    tick: Tick,
    subsystem: &str,
    events: &[SimEvent],
) -> SimResult<()> {
    for event in events {
        let entry = EventLogEntry {
            id:         log.len() as u64 + 1,
            run_id:     run_id.to_string(),
            tick,
            subsystem:  subsystem.to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        log.push(entry);
    }
    Ok(())
}
