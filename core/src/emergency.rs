//! Emergency records, the fixed incident catalog, and the status
//! state machine.
//!
//! Status only moves forward:
//!   active → assigned → {resolved, failed}
//!   active → failed              (timeout sweep, or a player fail)
//!
//! Nothing is resolved without first being assigned.
//!
//! Terminal emergencies are kept forever; stats are folded over them.

use crate::{
    error::TransitionError,
    roster::SkillType,
    types::{EntityId, Millis},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Handling time before experience scaling.
    pub fn base_time_ms(&self) -> Millis {
        match self {
            Self::Low      => 10_000,
            Self::Medium   => 15_000,
            Self::High     => 20_000,
            Self::Critical => 25_000,
        }
    }

    /// Success chance before skill and specialty bonuses.
    pub fn base_chance(&self) -> f64 {
        match self {
            Self::Low      => 0.95,
            Self::Medium   => 0.85,
            Self::High     => 0.75,
            Self::Critical => 0.65,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyStatus {
    Active,
    Assigned,
    Resolved,
    Failed,
}

impl EmergencyStatus {
    /// Active or assigned. Counts against the generation cap.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Assigned)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

/// How a handled emergency ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Resolved,
    Failed,
}

impl Outcome {
    pub fn status(&self) -> EmergencyStatus {
        match self {
            Self::Resolved => EmergencyStatus::Resolved,
            Self::Failed   => EmergencyStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyKind {
    #[serde(rename = "Fire Alert")]
    FireAlert,
    #[serde(rename = "Medical Emergency")]
    MedicalEmergency,
    #[serde(rename = "Security Breach")]
    SecurityBreach,
    #[serde(rename = "Technical Failure")]
    TechnicalFailure,
    #[serde(rename = "Noise Complaint")]
    NoiseComplaint,
}

impl EmergencyKind {
    /// Catalog order; the generator walks it round-robin.
    pub const ALL: [EmergencyKind; 5] = [
        EmergencyKind::FireAlert,
        EmergencyKind::MedicalEmergency,
        EmergencyKind::SecurityBreach,
        EmergencyKind::TechnicalFailure,
        EmergencyKind::NoiseComplaint,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FireAlert        => "Fire Alert",
            Self::MedicalEmergency => "Medical Emergency",
            Self::SecurityBreach   => "Security Breach",
            Self::TechnicalFailure => "Technical Failure",
            Self::NoiseComplaint   => "Noise Complaint",
        }
    }

    pub fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Self::FireAlert => &[
                "Smoke detected in building A, floor 3",
                "Fire alarm triggered in parking garage",
                "Heat sensor activated in server room",
            ],
            Self::MedicalEmergency => &[
                "Person collapsed in lobby area",
                "Medical assistance requested in elevator",
                "Heart attack reported in cafeteria",
            ],
            Self::SecurityBreach => &[
                "Unauthorized access detected in restricted area",
                "Multiple failed login attempts on system",
                "Suspicious activity on camera 7",
            ],
            Self::TechnicalFailure => &[
                "Elevator stuck between floors 2 and 3",
                "Power outage in east wing",
                "Network connection lost to building B",
            ],
            Self::NoiseComplaint => &[
                "Loud music reported from office 203",
                "Construction noise exceeding limits",
                "Neighbor complaint about late night activity",
            ],
        }
    }

    pub fn allowed_priorities(&self) -> &'static [Priority] {
        match self {
            Self::FireAlert        => &[Priority::Medium, Priority::High, Priority::Critical],
            Self::MedicalEmergency => &[Priority::High, Priority::Critical],
            Self::SecurityBreach   => &[Priority::Medium, Priority::High],
            Self::TechnicalFailure => &[Priority::Low, Priority::Medium],
            Self::NoiseComplaint   => &[Priority::Low],
        }
    }

    /// Skill an operator needs for this type.
    pub fn skill(&self) -> SkillType {
        SkillType::for_emergency_type(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emergency {
    pub id:          EntityId,
    /// Generation order within the session, starting at 1.
    pub seq:         u64,
    #[serde(rename = "type")]
    pub kind:        EmergencyKind,
    pub description: String,
    pub priority:    Priority,
    pub status:      EmergencyStatus,
    pub created_at:  Millis,
    pub assigned_operator: Option<EntityId>,
    /// Whole seconds from creation to the terminal transition.
    pub resolution_time:   Option<u64>,
}

impl Emergency {
    pub fn new(
        seq: u64,
        kind: EmergencyKind,
        description: impl Into<String>,
        priority: Priority,
        created_at: Millis,
    ) -> Self {
        Self {
            id: format!("emergency-{created_at}-{seq}"),
            seq,
            kind,
            description: description.into(),
            priority,
            status: EmergencyStatus::Active,
            created_at,
            assigned_operator: None,
            resolution_time: None,
        }
    }

    pub fn age_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.created_at)
    }

    fn reject(&self, to: EmergencyStatus) -> TransitionError {
        TransitionError::InvalidTransition {
            emergency_id: self.id.clone(),
            from: self.status,
            to,
        }
    }

    /// active → assigned.
    pub fn assign(&mut self, operator_id: &str) -> Result<(), TransitionError> {
        if self.status != EmergencyStatus::Active {
            return Err(self.reject(EmergencyStatus::Assigned));
        }
        self.status = EmergencyStatus::Assigned;
        self.assigned_operator = Some(operator_id.to_string());
        Ok(())
    }

    /// assigned → resolved | failed, or active → failed. Stamps the
    /// resolution time.
    pub fn resolve(&mut self, outcome: Outcome, now: Millis) -> Result<(), TransitionError> {
        let allowed = match self.status {
            EmergencyStatus::Assigned => true,
            EmergencyStatus::Active => outcome == Outcome::Failed,
            EmergencyStatus::Resolved | EmergencyStatus::Failed => false,
        };
        if !allowed {
            return Err(self.reject(outcome.status()));
        }
        self.status = outcome.status();
        self.resolution_time = Some(self.age_ms(now) / 1_000);
        Ok(())
    }

    /// active → failed once the emergency has waited longer than
    /// `max_age_ms`. Returns true if this call failed it.
    pub fn time_out(&mut self, now: Millis, max_age_ms: Millis, resolution_secs: u64) -> bool {
        if self.status != EmergencyStatus::Active || self.age_ms(now) <= max_age_ms {
            return false;
        }
        self.status = EmergencyStatus::Failed;
        self.resolution_time = Some(resolution_secs);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(created_at: Millis) -> Emergency {
        Emergency::new(1, EmergencyKind::FireAlert, "Smoke", Priority::High, created_at)
    }

    #[test]
    fn assign_only_from_active() {
        let mut e = fire(0);
        e.assign("operator-1").unwrap();
        assert_eq!(e.status, EmergencyStatus::Assigned);
        let err = e.assign("operator-2").unwrap_err();
        assert_eq!(err.reason(), "invalid_transition");
        assert_eq!(e.assigned_operator.as_deref(), Some("operator-1"));
    }

    #[test]
    fn resolve_stamps_whole_seconds() {
        let mut e = fire(2_000);
        e.assign("operator-1").unwrap();
        e.resolve(Outcome::Resolved, 14_999).unwrap();
        assert_eq!(e.resolution_time, Some(12));
        assert!(e.resolve(Outcome::Failed, 20_000).is_err());
        assert_eq!(e.status, EmergencyStatus::Resolved);
    }

    #[test]
    fn active_can_fail_but_not_resolve() {
        let mut e = fire(0);
        let err = e.resolve(Outcome::Resolved, 5_000).unwrap_err();
        assert_eq!(err.reason(), "invalid_transition");
        assert_eq!(e.status, EmergencyStatus::Active);
        assert_eq!(e.resolution_time, None);

        e.resolve(Outcome::Failed, 5_000).unwrap();
        assert_eq!(e.status, EmergencyStatus::Failed);
        assert_eq!(e.resolution_time, Some(5));
    }

    #[test]
    fn time_out_requires_strictly_older_than_limit() {
        let mut e = fire(0);
        assert!(!e.time_out(60_000, 60_000, 60));
        assert!(e.time_out(60_001, 60_000, 60));
        assert_eq!(e.resolution_time, Some(60));
        assert!(!e.time_out(120_000, 60_000, 60));
    }

    #[test]
    fn catalog_skill_mapping() {
        assert_eq!(EmergencyKind::SecurityBreach.skill(), SkillType::Security);
        assert_eq!(EmergencyKind::TechnicalFailure.skill(), SkillType::Technical);
        assert_eq!(EmergencyKind::NoiseComplaint.skill(), SkillType::Technical);
    }
}
