//! Session state: the seam between the simulation and whatever draws it.
//!
//! Setters overwrite without validation. Selection ids may point at
//! operators that no longer match the UI; the core never reads them.

use crate::{stats::GameStats, types::EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Room {
    #[default]
    Dispatch,
    Surveillance,
    #[serde(rename = "breakroom")]
    BreakRoom,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub selected_operator:    Option<EntityId>,
    pub selected_workstation: Option<String>,
    pub current_room:         Room,
    pub stats:                GameStats,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_operator(&mut self, operator_id: Option<EntityId>) {
        log::debug!("session: selected operator {operator_id:?}");
        self.selected_operator = operator_id;
    }

    pub fn set_selected_workstation(&mut self, workstation_id: Option<String>) {
        log::debug!("session: selected workstation {workstation_id:?}");
        self.selected_workstation = workstation_id;
    }

    pub fn set_current_room(&mut self, room: Room) {
        log::debug!("session: switching to room {room:?}");
        self.current_room = room;
    }

    pub fn update_stats(&mut self, stats: GameStats) {
        self.stats = stats;
    }

    /// Back to the initial selection, room, and stats.
    pub fn reset_game(&mut self) {
        *self = Self::default();
    }
}
