//! Domain-level error type used across the scheduler and action handlers.
//!
//! This error type is transport- and storage-agnostic. Service entry points
//! return `Result<T, crate::error::EngineError>` and convert from
//! `DomainError` using the provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::catalog::{GroupType, StatusCode};
use crate::domain::participant::RoomId;

/// Terminal signal: an alignment is extinct and the game is over.
///
/// Travels as an error variant so every call frame between the win
/// evaluator and the service boundary forwards it explicitly with `?`; it
/// is caught exactly once, at the boundary, which finalizes and resets the
/// room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameFinished {
    pub room_id: RoomId,
    pub winner: GroupType,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Action not permitted in the current phase/state. Reported to the
    /// caller as a standard status with no state mutation.
    Rejected { code: StatusCode, detail: String },
    /// Malformed room setup; fatal to that setup path.
    Config(String),
    /// Win detected; not a failure, but it propagates like one.
    Finished(GameFinished),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Rejected { code, detail } => {
                write!(f, "rejected ({}): {detail}", code.label())
            }
            DomainError::Config(d) => write!(f, "configuration error: {d}"),
            DomainError::Finished(done) => {
                write!(f, "game {} finished, winner {}", done.room_id, done.winner)
            }
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn rejected(code: StatusCode, detail: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            detail: detail.into(),
        }
    }

    /// The standardized "cannot act" rejection.
    pub fn cannot_act(detail: impl Into<String>) -> Self {
        Self::rejected(StatusCode::CannotAct, detail)
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            DomainError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}
