//! Domain-level error type used across the engine and services.
//!
//! This error type is transport-agnostic. The service layer decides how each
//! variant reaches a client: validation and conflict errors become an
//! `error_msg` to the sender, phase mismatches are dropped as stale messages.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds for client-supplied input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Wrong number of concepts, or an empty concept after trimming.
    ConceptList,
    /// Player already submitted this input and it is immutable.
    AlreadySubmitted,
    /// Life selection indices or secret index out of range.
    PickRange,
    /// Action requires a living player.
    NotAlive,
    /// Sender holds no seat in this match.
    NotSeated,
}

/// Semantic conflict kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// All seats are occupied.
    MatchFull,
}

/// Central domain error type.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation.
    Validation(ValidationKind, String),
    /// Action attempted outside its valid phase; treated as a stale message.
    PhaseMismatch(String),
    /// Semantic conflict.
    Conflict(ConflictKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::PhaseMismatch(d) => write!(f, "phase mismatch: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn phase(detail: impl Into<String>) -> Self {
        Self::PhaseMismatch(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
}
