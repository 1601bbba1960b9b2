//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::investigation::{Direction, Phase};

/// Domain errors represent game rule violations.
/// Everything except `Allocation` is recoverable: the game state is unchanged
/// and the player may retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot build room map: {reason}")]
    Allocation { reason: String },

    #[error("no room to the {direction} of {room}")]
    InvalidDirection { room: String, direction: Direction },

    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    #[error("accusation must name a suspect")]
    EmptyAccusation,

    #[error("not possible while {actual} (expected {expected})")]
    WrongPhase { expected: Phase, actual: Phase },
}

impl DomainError {
    /// True for errors the player can recover from by retrying.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DomainError::Allocation { .. })
    }

    pub(crate) fn allocation(reason: impl Into<String>) -> Self {
        Self::Allocation {
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
