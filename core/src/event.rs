//! The event log: every observable state change in the simulation.
//!
//! Events are emitted by subsystems and by player command handling, and
//! appended to the engine's log in emission order. Presentation and
//! tests read them; no subsystem reacts to another's events.

use crate::{
    emergency::{EmergencyKind, Outcome, Priority},
    roster::{OperatorStatus, SkillType},
    session::Room,
    stats::GameStats,
    types::{EntityId, Millis, RunId, Tick},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },
    RunInitialized {
        run_id: RunId,
        seed: u64,
    },

    // ── Player command events ──────────────────────
    PlayerCommandReceived {
        tick: Tick,
        command_type: String,
    },
    /// A command referenced a missing entity or an out-of-state emergency
    /// and was dropped.
    CommandIgnored {
        tick: Tick,
        command_type: String,
        reason: String,
        detail: String,
    },
    OperatorSelected {
        tick: Tick,
        operator_id: Option<EntityId>,
    },
    RoomChanged {
        tick: Tick,
        room: Room,
    },
    GameReset {
        tick: Tick,
    },

    // ── Emergency lifecycle ────────────────────────
    EmergencyGenerated {
        tick: Tick,
        emergency_id: EntityId,
        kind: EmergencyKind,
        priority: Priority,
        description: String,
    },
    OperatorAssigned {
        tick: Tick,
        emergency_id: EntityId,
        operator_id: EntityId,
    },
    HandlingStarted {
        tick: Tick,
        emergency_id: EntityId,
        operator_id: EntityId,
        required_time_ms: Millis,
    },
    HandlingAbandoned {
        tick: Tick,
        emergency_id: EntityId,
        operator_id: EntityId,
    },
    EmergencyResolved {
        tick: Tick,
        emergency_id: EntityId,
        outcome: Outcome,
        resolution_time: u64,
        operator_id: Option<EntityId>,
    },
    EmergencyTimedOut {
        tick: Tick,
        emergency_id: EntityId,
        resolution_time: u64,
    },

    // ── Roster events ──────────────────────────────
    OperatorStatusChanged {
        tick: Tick,
        operator_id: EntityId,
        status: OperatorStatus,
    },
    SkillImproved {
        tick: Tick,
        operator_id: EntityId,
        skill: SkillType,
        new_value: u8,
    },

    // ── Stats ──────────────────────────────────────
    StatsUpdated {
        tick: Tick,
        stats: GameStats,
    },
}

impl SimEvent {
    /// Stable name for the event_type column of the log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }           => "tick_started",
            Self::TickCompleted { .. }         => "tick_completed",
            Self::RunInitialized { .. }        => "run_initialized",
            Self::PlayerCommandReceived { .. } => "player_command_received",
            Self::CommandIgnored { .. }        => "command_ignored",
            Self::OperatorSelected { .. }      => "operator_selected",
            Self::RoomChanged { .. }           => "room_changed",
            Self::GameReset { .. }             => "game_reset",
            Self::EmergencyGenerated { .. }    => "emergency_generated",
            Self::OperatorAssigned { .. }      => "operator_assigned",
            Self::HandlingStarted { .. }       => "handling_started",
            Self::HandlingAbandoned { .. }     => "handling_abandoned",
            Self::EmergencyResolved { .. }     => "emergency_resolved",
            Self::EmergencyTimedOut { .. }     => "emergency_timed_out",
            Self::OperatorStatusChanged { .. } => "operator_status_changed",
            Self::SkillImproved { .. }         => "skill_improved",
            Self::StatsUpdated { .. }          => "stats_updated",
        }
    }
}

/// One row of the in-memory event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: u64,
    pub run_id: RunId,
    pub tick: Tick,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
