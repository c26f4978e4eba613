use crate::emergency::EmergencyStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// Rejected emergency state change. The engine turns these into ignored
/// commands; they never abort a tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Emergency '{emergency_id}' cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        emergency_id: String,
        from: EmergencyStatus,
        to: EmergencyStatus,
    },

    #[error("Emergency '{emergency_id}' not found")]
    EmergencyNotFound { emergency_id: String },

    #[error("Operator '{operator_id}' not found")]
    OperatorNotFound { operator_id: String },

    #[error("Workstation '{workstation_id}' does not exist")]
    WorkstationNotFound { workstation_id: String },

    #[error("Operator '{operator_id}' is already handling '{emergency_id}'")]
    OperatorAlreadyAssigned {
        operator_id: String,
        emergency_id: String,
    },
}

impl TransitionError {
    /// Stable short name used in `CommandIgnored` events.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. }       => "invalid_transition",
            Self::EmergencyNotFound { .. }       => "emergency_not_found",
            Self::OperatorNotFound { .. }        => "operator_not_found",
            Self::WorkstationNotFound { .. }     => "workstation_not_found",
            Self::OperatorAlreadyAssigned { .. } => "operator_already_assigned",
        }
    }
}
