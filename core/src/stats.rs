//! Derived performance metrics over the emergency history.
//!
//! Stats are a pure fold over every emergency ever generated; nothing is
//! accumulated incrementally.

use crate::emergency::{Emergency, EmergencyStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Resolved share of all emergencies, whole percent rounded down.
    pub success_rate:          u32,
    /// Mean resolution time in whole seconds.
    pub average_response_time: u64,
    pub total_emergencies:     usize,
    pub resolved_emergencies:  usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            success_rate:          100,
            average_response_time: 0,
            total_emergencies:     0,
            resolved_emergencies:  0,
        }
    }
}

impl GameStats {
    pub fn compute(history: &[Emergency]) -> Self {
        let total = history.len();
        if total == 0 {
            return Self::default();
        }

        let resolved = history
            .iter()
            .filter(|e| e.status == EmergencyStatus::Resolved)
            .count();

        let (timed, time_sum) = history
            .iter()
            .filter_map(|e| e.resolution_time)
            .fold((0u64, 0u64), |(n, sum), t| (n + 1, sum + t));

        Self {
            success_rate:          (resolved * 100 / total) as u32,
            average_response_time: time_sum / timed.max(1),
            total_emergencies:     total,
            resolved_emergencies:  resolved,
        }
    }
}
