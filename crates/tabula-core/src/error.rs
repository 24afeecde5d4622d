#![forbid(unsafe_code)]

//! The arena error taxonomy.
//!
//! Every public fallible operation in Tabula returns [`Result`]. No error in
//! the engine propagates as a panic; policy violations degrade (a cancelled
//! drag, an unchanged layout) rather than abort.

use thiserror::Error;

use crate::piece::PieceId;

/// Convenience alias used across all Tabula crates.
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Errors surfaced by the arena engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Malformed piece data rejected at the boundary; never enters the scene.
    #[error("invalid piece: {reason}")]
    InvalidPiece { reason: String },

    /// An operation referenced an identity the scene does not contain.
    /// The operation is a no-op.
    #[error("unknown piece identity: {id}")]
    UnknownIdentity { id: PieceId },

    /// An identity appeared twice where the one-record invariant forbids it.
    #[error("duplicate piece identity: {id}")]
    DuplicateIdentity { id: PieceId },

    /// A layout or drop policy produced an inconsistent result. Logged and
    /// degraded, never fatal.
    #[error("policy violation: {message}")]
    PolicyViolation { message: String },
}

impl ArenaError {
    /// Shorthand for a policy violation with a formatted message.
    #[must_use]
    pub fn policy(message: impl Into<String>) -> Self {
        Self::PolicyViolation {
            message: message.into(),
        }
    }
}
