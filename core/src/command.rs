use serde::{Deserialize, Serialize};
use crate::{emergency::Outcome, session::Room, types::EntityId};

/// All player-issued commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetSpeed { speed: crate::clock::SimSpeed },

    // ── Selection ─────────────────────────────────
    SelectOperator {
        operator_id: Option<EntityId>,
    },
    SelectWorkstation {
        workstation_id: Option<String>,
    },
    SetCurrentRoom {
        room: Room,
    },

    // ── Emergency handling ────────────────────────
    AssignOperator {
        emergency_id: EntityId,
        operator_id:  EntityId,
    },
    ResolveEmergency {
        emergency_id: EntityId,
        outcome:      Outcome,
    },
    AssignWorkstation {
        operator_id:    EntityId,
        workstation_id: String,
    },

    ResetGame,
}

impl PlayerCommand {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Pause                  => "pause",
            Self::Resume                 => "resume",
            Self::SetSpeed { .. }        => "set_speed",
            Self::SelectOperator { .. }  => "select_operator",
            Self::SelectWorkstation { .. } => "select_workstation",
            Self::SetCurrentRoom { .. }  => "set_current_room",
            Self::AssignOperator { .. }  => "assign_operator",
            Self::ResolveEmergency { .. } => "resolve_emergency",
            Self::AssignWorkstation { .. } => "assign_workstation",
            Self::ResetGame              => "reset_game",
        }
    }
}
