//! Typed boundary errors
//!
//! Only caller-owned precondition failures are errors. An unsatisfiable
//! lineup is a first-class result (a non-empty violation list), never an
//! error.

use thiserror::Error;

/// Hard-reject conditions, surfaced before any scheduling work begins
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("not enough available players: {available} available for field size {field_size}")]
    NotEnoughPlayers { available: usize, field_size: usize },

    #[error("formation has no positions")]
    EmptyFormation,

    #[error("duplicate position in formation: {0}")]
    DuplicatePosition(String),

    #[error("duplicate player name in roster: {0}")]
    DuplicateName(String),

    #[error("duplicate shirt number in roster: {0}")]
    DuplicateNumber(u8),

    #[error("quarters must be at least 1")]
    ZeroQuarters,
}
