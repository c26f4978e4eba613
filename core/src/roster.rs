//! Operator roster: the fixed staff of the operations center.
//!
//! The roster is created once per session and never shrinks. Every
//! lookup by id is tolerant: a missing operator is a silent no-op and the
//! mutators report whether they found their target so callers can log.

use crate::{rng::SubsystemRng, types::EntityId};
use serde::{Deserialize, Serialize};

pub const ROSTER_SIZE: usize = 8;

/// Default session staff.
pub const DEFAULT_OPERATOR_NAMES: [&str; ROSTER_SIZE] = [
    "Alex Chen", "Jordan Smith", "Taylor Davis", "Morgan Lee",
    "Casey Johnson", "Riley Wilson", "Avery Brown", "Quinn Martinez",
];

/// Specialties handed out by roster position, cycling.
const SPECIALTY_PATTERN: [Specialty; ROSTER_SIZE] = [
    Specialty::Fire,
    Specialty::Medical,
    Specialty::Security,
    Specialty::Technical,
    Specialty::Fire,
    Specialty::Medical,
    Specialty::Security,
    Specialty::General,
];

pub const SKILL_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Fire,
    Medical,
    Security,
    Technical,
}

impl SkillType {
    pub const ALL: [SkillType; 4] = [
        SkillType::Fire,
        SkillType::Medical,
        SkillType::Security,
        SkillType::Technical,
    ];

    /// Map an emergency type name to the skill that handles it, by
    /// case-insensitive substring. Unknown types fall back to technical.
    pub fn for_emergency_type(type_name: &str) -> SkillType {
        let name = type_name.to_lowercase();
        if name.contains("fire") {
            SkillType::Fire
        } else if name.contains("medical") {
            SkillType::Medical
        } else if name.contains("security") || name.contains("breach") {
            SkillType::Security
        } else {
            // "technical", "failure" and everything unmapped.
            SkillType::Technical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Fire,
    Medical,
    Security,
    Technical,
    General,
}

impl Specialty {
    /// The skill this specialty is strongest in. `General` has none.
    pub fn skill(&self) -> Option<SkillType> {
        match self {
            Self::Fire      => Some(SkillType::Fire),
            Self::Medical   => Some(SkillType::Medical),
            Self::Security  => Some(SkillType::Security),
            Self::Technical => Some(SkillType::Technical),
            Self::General   => None,
        }
    }

    pub fn matches(&self, skill: SkillType) -> bool {
        self.skill() == Some(skill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorStatus {
    Idle,
    /// Just assigned; flips to `Busy` on the next handling tick.
    Responding,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub fire:      u8,
    pub medical:   u8,
    pub security:  u8,
    pub technical: u8,
}

impl Skills {
    pub fn uniform(value: u8) -> Self {
        let v = value.min(SKILL_MAX);
        Self { fire: v, medical: v, security: v, technical: v }
    }

    pub fn get(&self, skill: SkillType) -> u8 {
        match skill {
            SkillType::Fire      => self.fire,
            SkillType::Medical   => self.medical,
            SkillType::Security  => self.security,
            SkillType::Technical => self.technical,
        }
    }

    fn slot_mut(&mut self, skill: SkillType) -> &mut u8 {
        match skill {
            SkillType::Fire      => &mut self.fire,
            SkillType::Medical   => &mut self.medical,
            SkillType::Security  => &mut self.security,
            SkillType::Technical => &mut self.technical,
        }
    }

    pub fn set(&mut self, skill: SkillType, value: u8) {
        *self.slot_mut(skill) = value.min(SKILL_MAX);
    }

    /// Add `amount`, saturating at 100.
    pub fn raise(&mut self, skill: SkillType, amount: u8) {
        let slot = self.slot_mut(skill);
        *slot = slot.saturating_add(amount).min(SKILL_MAX);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id:         EntityId,
    pub name:       String,
    pub specialty:  Specialty,
    pub skills:     Skills,
    pub experience: u8,
    pub status:     OperatorStatus,
    pub assigned_workstation: Option<String>,
}

impl Operator {
    pub fn is_idle(&self) -> bool {
        self.status == OperatorStatus::Idle
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    operators: Vec<Operator>,
}

impl Roster {
    /// Roll a fresh roster. Specialties follow the fixed cyclic pattern;
    /// every skill gets a base roll in [30,50], the specialty skill is
    /// re-rolled in [60,80], and experience lands in [50,90].
    pub fn create<S: AsRef<str>>(names: &[S], rng: &mut SubsystemRng) -> Self {
        let operators = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let specialty = SPECIALTY_PATTERN[index % SPECIALTY_PATTERN.len()];
                let mut skills = Skills::uniform(0);
                for skill in SkillType::ALL {
                    skills.set(skill, rng.range_inclusive(30, 50));
                }
                if let Some(own) = specialty.skill() {
                    skills.set(own, rng.range_inclusive(60, 80));
                }
                Operator {
                    id:         format!("operator-{}", index + 1),
                    name:       name.as_ref().to_string(),
                    specialty,
                    skills,
                    experience: rng.range_inclusive(50, 90),
                    status:     OperatorStatus::Idle,
                    assigned_workstation: Some((index + 1).to_string()),
                }
            })
            .collect();
        Self { operators }
    }

    /// Build a roster from explicit operators. Used by tests and tooling
    /// that need exact skill values.
    pub fn from_operators(operators: Vec<Operator>) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn find_by_id(&self, operator_id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == operator_id)
    }

    fn find_mut(&mut self, operator_id: &str) -> Option<&mut Operator> {
        self.operators.iter_mut().find(|op| op.id == operator_id)
    }

    pub fn list_idle(&self) -> Vec<&Operator> {
        self.operators.iter().filter(|op| op.is_idle()).collect()
    }

    pub fn list_busy_or_responding(&self) -> Vec<&Operator> {
        self.operators
            .iter()
            .filter(|op| matches!(op.status, OperatorStatus::Busy | OperatorStatus::Responding))
            .collect()
    }

    /// Returns false if the operator does not exist.
    pub fn set_status(&mut self, operator_id: &str, status: OperatorStatus) -> bool {
        match self.find_mut(operator_id) {
            Some(op) => {
                op.status = status;
                true
            }
            None => false,
        }
    }

    /// Raise one skill by `amount` and experience by one, both capped at 100.
    /// Returns the new skill value, or None if the operator does not exist.
    pub fn improve_skill(&mut self, operator_id: &str, skill: SkillType, amount: u8) -> Option<u8> {
        let op = self.find_mut(operator_id)?;
        op.skills.raise(skill, amount);
        op.experience = op.experience.saturating_add(1).min(SKILL_MAX);
        Some(op.skills.get(skill))
    }

    /// Move an operator to another workstation slot. Returns false if the
    /// operator does not exist or the slot is not one of "1".."8".
    pub fn assign_workstation(&mut self, operator_id: &str, workstation_id: &str) -> bool {
        if !is_workstation_slot(workstation_id) {
            return false;
        }
        match self.find_mut(operator_id) {
            Some(op) => {
                op.assigned_workstation = Some(workstation_id.to_string());
                true
            }
            None => false,
        }
    }
}

/// Workstation slots are numbered "1" through "8", one per roster seat.
pub fn is_workstation_slot(workstation_id: &str) -> bool {
    workstation_id
        .parse::<usize>()
        .is_ok_and(|n| (1..=ROSTER_SIZE).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workstation_slots_are_one_through_eight() {
        assert!(is_workstation_slot("1"));
        assert!(is_workstation_slot("8"));
        assert!(!is_workstation_slot("0"));
        assert!(!is_workstation_slot("9"));
        assert!(!is_workstation_slot("lobby"));
    }

    #[test]
    fn skill_mapping_uses_type_substrings() {
        assert_eq!(SkillType::for_emergency_type("Fire Alert"), SkillType::Fire);
        assert_eq!(SkillType::for_emergency_type("Medical Emergency"), SkillType::Medical);
        assert_eq!(SkillType::for_emergency_type("Security Breach"), SkillType::Security);
        assert_eq!(SkillType::for_emergency_type("Perimeter breach"), SkillType::Security);
        assert_eq!(SkillType::for_emergency_type("Technical Failure"), SkillType::Technical);
        assert_eq!(SkillType::for_emergency_type("Noise Complaint"), SkillType::Technical);
    }

    #[test]
    fn raise_saturates() {
        let mut skills = Skills::uniform(99);
        skills.raise(SkillType::Fire, 250);
        assert_eq!(skills.fire, 100);
        assert_eq!(skills.medical, 99);
    }
}
